// src/services/mod.rs

//! Core services: link classification, site access, snapshot building,
//! and tree diffing.

pub mod builder;
pub mod classifier;
pub mod differ;
pub mod drive;
pub mod site;

pub use builder::TreeBuilder;
pub use classifier::{Anchor, Classified, Link, LinkClassifier};
pub use differ::diff_trees;
pub use site::{CourseSite, FetchedPage, HttpSite};
