// src/services/differ.rs

//! Diff engine.
//!
//! Structurally compares two snapshot trees of the same course, matching
//! folders and files by their URL identity, and emits an ordered list of
//! typed change records. Iteration follows the stored page order of each
//! tree, so repeated diffs of the same pair yield identical output.

use std::collections::HashMap;

use crate::models::{ChangeKind, ChangeRecord, FileEntry, FolderNode};

/// Compare two snapshots and return the ordered change list.
///
/// With no previous snapshot, the latest tree's contents are reported as
/// additions; the root folder itself is not reported.
pub fn diff_trees(previous: Option<&FolderNode>, latest: &FolderNode) -> Vec<ChangeRecord> {
    let mut records = Vec::new();

    match previous {
        None => {
            for file in &latest.files {
                records.push(ChangeRecord::new(
                    ChangeKind::FileAdded,
                    join(&latest.name, &file.name),
                ));
            }
            for child in &latest.folders {
                report_all_added(child, &latest.name, &mut records);
            }
        }
        Some(previous) => diff_level(previous, latest, &latest.name, &mut records),
    }

    records
}

/// Diff one matched folder level at `path`, recursing into matched children.
fn diff_level(
    previous: &FolderNode,
    latest: &FolderNode,
    path: &str,
    records: &mut Vec<ChangeRecord>,
) {
    let prev_dirs: HashMap<&str, &FolderNode> = previous
        .folders
        .iter()
        .map(|d| (d.url.as_str(), d))
        .collect();
    let latest_dirs: HashMap<&str, &FolderNode> = latest
        .folders
        .iter()
        .map(|d| (d.url.as_str(), d))
        .collect();

    // deleted directories; their contents are subsumed by this record
    for child in &previous.folders {
        if !latest_dirs.contains_key(child.url.as_str()) {
            records.push(ChangeRecord::new(
                ChangeKind::DirectoryDeleted,
                join(path, &child.name),
            ));
        }
    }

    // added directories, each reported with its entire subtree
    for child in &latest.folders {
        if !prev_dirs.contains_key(child.url.as_str()) {
            report_all_added(child, path, records);
        }
    }

    // matched directories recurse, in latest page order
    for child in &latest.folders {
        if let Some(old_child) = prev_dirs.get(child.url.as_str()) {
            diff_level(old_child, child, &join(path, &child.name), records);
        }
    }

    let prev_files: HashMap<&str, &FileEntry> = previous
        .files
        .iter()
        .map(|f| (f.url.as_str(), f))
        .collect();
    let latest_files: HashMap<&str, &FileEntry> = latest
        .files
        .iter()
        .map(|f| (f.url.as_str(), f))
        .collect();

    for file in &previous.files {
        if !latest_files.contains_key(file.url.as_str()) {
            records.push(ChangeRecord::new(
                ChangeKind::FileDeleted,
                join(path, &file.name),
            ));
        }
    }

    // a digest appearing or disappearing counts as an update
    for file in &latest.files {
        if let Some(old_file) = prev_files.get(file.url.as_str()) {
            if old_file.digest != file.digest {
                records.push(ChangeRecord::new(
                    ChangeKind::FileUpdated,
                    join(path, &file.name),
                ));
            }
        }
    }

    for file in &latest.files {
        if !prev_files.contains_key(file.url.as_str()) {
            records.push(ChangeRecord::new(
                ChangeKind::FileAdded,
                join(path, &file.name),
            ));
        }
    }
}

/// Report a newly appeared directory subtree as additions.
fn report_all_added(node: &FolderNode, base: &str, records: &mut Vec<ChangeRecord>) {
    let dir_path = join(base, &node.name);
    records.push(ChangeRecord::new(ChangeKind::DirectoryAdded, dir_path.clone()));

    for file in &node.files {
        records.push(ChangeRecord::new(
            ChangeKind::FileAdded,
            join(&dir_path, &file.name),
        ));
    }
    for child in &node.folders {
        report_all_added(child, &dir_path, records);
    }
}

fn join(base: &str, name: &str) -> String {
    format!("{base}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(url: &str, name: &str, digest: Option<&str>) -> FileEntry {
        FileEntry {
            url: url.to_string(),
            name: name.to_string(),
            digest: digest.map(String::from),
            etag: None,
        }
    }

    fn folder(url: &str, name: &str, folders: Vec<FolderNode>, files: Vec<FileEntry>) -> FolderNode {
        FolderNode {
            url: url.to_string(),
            name: name.to_string(),
            local_path: PathBuf::from(name),
            folders,
            files,
        }
    }

    fn labs(files: Vec<FileEntry>) -> FolderNode {
        folder("https://x/labs/", "Labs", Vec::new(), files)
    }

    fn course(folders: Vec<FolderNode>, files: Vec<FileEntry>) -> FolderNode {
        folder("https://x/", "Course", folders, files)
    }

    fn kinds(records: &[ChangeRecord]) -> Vec<ChangeKind> {
        records.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_identical_trees_yield_no_changes() {
        let tree = course(
            vec![labs(vec![file("https://x/lab1.pdf", "lab1.pdf", Some("abc"))])],
            vec![file("https://x/syllabus.pdf", "syllabus.pdf", Some("s1"))],
        );

        assert!(diff_trees(Some(&tree), &tree).is_empty());
    }

    #[test]
    fn test_diff_is_deterministic() {
        let previous = course(
            vec![
                labs(vec![file("https://x/lab1.pdf", "lab1.pdf", Some("abc"))]),
                folder("https://x/exams/", "Exams", Vec::new(), Vec::new()),
            ],
            vec![file("https://x/a.pdf", "a.pdf", Some("a1"))],
        );
        let latest = course(
            vec![
                labs(vec![
                    file("https://x/lab1.pdf", "lab1.pdf", Some("xyz")),
                    file("https://x/lab2.pdf", "lab2.pdf", Some("new")),
                ]),
                folder("https://x/hw/", "Homework", Vec::new(), Vec::new()),
            ],
            vec![file("https://x/b.pdf", "b.pdf", Some("b1"))],
        );

        let first = diff_trees(Some(&previous), &latest);
        let second = diff_trees(Some(&previous), &latest);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_addition_completeness_from_empty() {
        let latest = course(
            vec![
                labs(vec![
                    file("https://x/lab1.pdf", "lab1.pdf", Some("a")),
                    file("https://x/lab2.pdf", "lab2.pdf", Some("b")),
                ]),
                folder(
                    "https://x/exams/",
                    "Exams",
                    vec![folder(
                        "https://x/exams/2025/",
                        "2025",
                        Vec::new(),
                        vec![file("https://x/final.pdf", "final.pdf", Some("c"))],
                    )],
                    Vec::new(),
                ),
            ],
            vec![file("https://x/syllabus.pdf", "syllabus.pdf", Some("d"))],
        );

        let records = diff_trees(Some(&FolderNode::empty()), &latest);

        let added_files = records
            .iter()
            .filter(|r| r.kind == ChangeKind::FileAdded)
            .count();
        let added_dirs = records
            .iter()
            .filter(|r| r.kind == ChangeKind::DirectoryAdded)
            .count();

        assert_eq!(added_files, latest.file_count());
        assert_eq!(added_dirs, latest.folder_count());
        assert_eq!(records.len(), added_files + added_dirs);
    }

    #[test]
    fn test_absent_previous_reports_contents_not_root() {
        let latest = course(
            vec![labs(vec![file("https://x/lab1.pdf", "lab1.pdf", Some("a"))])],
            vec![file("https://x/syllabus.pdf", "syllabus.pdf", Some("d"))],
        );

        let records = diff_trees(None, &latest);

        assert_eq!(
            records,
            vec![
                ChangeRecord::new(ChangeKind::FileAdded, "Course/syllabus.pdf"),
                ChangeRecord::new(ChangeKind::DirectoryAdded, "Course/Labs"),
                ChangeRecord::new(ChangeKind::FileAdded, "Course/Labs/lab1.pdf"),
            ]
        );
    }

    #[test]
    fn test_add_delete_symmetry() {
        let previous = course(
            Vec::new(),
            vec![
                file("https://x/keep.pdf", "keep.pdf", Some("k")),
                file("https://x/old.pdf", "old.pdf", Some("o")),
            ],
        );
        let latest = course(
            Vec::new(),
            vec![
                file("https://x/keep.pdf", "keep.pdf", Some("k")),
                file("https://x/new.pdf", "new.pdf", Some("n")),
            ],
        );

        let forward = diff_trees(Some(&previous), &latest);
        let backward = diff_trees(Some(&latest), &previous);

        let added_forward: Vec<&str> = forward
            .iter()
            .filter(|r| r.kind == ChangeKind::FileAdded)
            .map(|r| r.path.as_str())
            .collect();
        let deleted_backward: Vec<&str> = backward
            .iter()
            .filter(|r| r.kind == ChangeKind::FileDeleted)
            .map(|r| r.path.as_str())
            .collect();

        assert_eq!(added_forward, deleted_backward);
        assert_eq!(added_forward, vec!["Course/new.pdf"]);
    }

    #[test]
    fn test_update_detection_is_single_record() {
        let previous = course(
            vec![labs(vec![file("https://x/A", "A", Some("h1"))])],
            Vec::new(),
        );
        let latest = course(
            vec![labs(vec![file("https://x/A", "A", Some("h2"))])],
            Vec::new(),
        );

        let records = diff_trees(Some(&previous), &latest);
        assert_eq!(
            records,
            vec![ChangeRecord::new(ChangeKind::FileUpdated, "Course/Labs/A")]
        );
    }

    #[test]
    fn test_digest_appearing_or_disappearing_is_update() {
        let previous = course(Vec::new(), vec![file("https://x/a", "a", None)]);
        let latest = course(Vec::new(), vec![file("https://x/a", "a", Some("h"))]);

        assert_eq!(
            kinds(&diff_trees(Some(&previous), &latest)),
            vec![ChangeKind::FileUpdated]
        );
        assert_eq!(
            kinds(&diff_trees(Some(&latest), &previous)),
            vec![ChangeKind::FileUpdated]
        );
    }

    #[test]
    fn test_both_digests_absent_is_no_change() {
        let previous = course(Vec::new(), vec![file("https://x/a", "a", None)]);
        let latest = course(Vec::new(), vec![file("https://x/a", "a", None)]);

        assert!(diff_trees(Some(&previous), &latest).is_empty());
    }

    #[test]
    fn test_update_before_addition_at_same_level() {
        let previous = course(
            vec![labs(vec![file("https://x/lab1.pdf", "lab1.pdf", Some("abc"))])],
            Vec::new(),
        );
        let latest = course(
            vec![labs(vec![
                file("https://x/lab2.pdf", "lab2.pdf", Some("new")),
                file("https://x/lab1.pdf", "lab1.pdf", Some("xyz")),
            ])],
            Vec::new(),
        );

        let records = diff_trees(Some(&previous), &latest);
        assert_eq!(
            records,
            vec![
                ChangeRecord::new(ChangeKind::FileUpdated, "Course/Labs/lab1.pdf"),
                ChangeRecord::new(ChangeKind::FileAdded, "Course/Labs/lab2.pdf"),
            ]
        );
    }

    #[test]
    fn test_deleted_directory_subsumes_its_files() {
        let previous = course(
            vec![folder(
                "https://x/exams/",
                "Exams",
                Vec::new(),
                vec![file("https://x/final.pdf", "final.pdf", Some("f"))],
            )],
            Vec::new(),
        );
        let latest = course(Vec::new(), Vec::new());

        let records = diff_trees(Some(&previous), &latest);
        assert_eq!(
            records,
            vec![ChangeRecord::new(
                ChangeKind::DirectoryDeleted,
                "Course/Exams"
            )]
        );
    }

    #[test]
    fn test_level_emission_order() {
        let previous = course(
            vec![
                folder("https://x/gone/", "Gone", Vec::new(), Vec::new()),
                labs(vec![file("https://x/lab1.pdf", "lab1.pdf", Some("a"))]),
            ],
            vec![
                file("https://x/removed.pdf", "removed.pdf", Some("r")),
                file("https://x/changed.pdf", "changed.pdf", Some("c1")),
            ],
        );
        let latest = course(
            vec![
                labs(vec![file("https://x/lab1.pdf", "lab1.pdf", Some("b"))]),
                folder(
                    "https://x/fresh/",
                    "Fresh",
                    Vec::new(),
                    vec![file("https://x/fresh/a.pdf", "a.pdf", Some("f"))],
                ),
            ],
            vec![
                file("https://x/changed.pdf", "changed.pdf", Some("c2")),
                file("https://x/added.pdf", "added.pdf", Some("n")),
            ],
        );

        let records = diff_trees(Some(&previous), &latest);
        assert_eq!(
            records,
            vec![
                ChangeRecord::new(ChangeKind::DirectoryDeleted, "Course/Gone"),
                ChangeRecord::new(ChangeKind::DirectoryAdded, "Course/Fresh"),
                ChangeRecord::new(ChangeKind::FileAdded, "Course/Fresh/a.pdf"),
                ChangeRecord::new(ChangeKind::FileUpdated, "Course/Labs/lab1.pdf"),
                ChangeRecord::new(ChangeKind::FileDeleted, "Course/removed.pdf"),
                ChangeRecord::new(ChangeKind::FileUpdated, "Course/changed.pdf"),
                ChangeRecord::new(ChangeKind::FileAdded, "Course/added.pdf"),
            ]
        );
    }

    #[test]
    fn test_renamed_folder_same_url_diffs_in_place() {
        // display name changed but identity is the URL, so the folder
        // matches and only its content differences are reported
        let previous = course(
            vec![folder(
                "https://x/labs/",
                "Labs",
                Vec::new(),
                vec![file("https://x/lab1.pdf", "lab1.pdf", Some("a"))],
            )],
            Vec::new(),
        );
        let latest = course(
            vec![folder(
                "https://x/labs/",
                "Lab Sessions",
                Vec::new(),
                vec![file("https://x/lab1.pdf", "lab1.pdf", Some("a"))],
            )],
            Vec::new(),
        );

        assert!(diff_trees(Some(&previous), &latest).is_empty());
    }
}
