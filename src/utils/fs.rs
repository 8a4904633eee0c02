// src/utils/fs.rs

//! Small filesystem helpers.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Load and parse a TOML file.
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(serde::Deserialize)]
    struct Sample {
        value: u32,
    }

    #[test]
    fn test_load_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"value = 7\n").unwrap();

        let sample: Sample = load_toml(file.path()).unwrap();
        assert_eq!(sample.value, 7);
    }

    #[test]
    fn test_load_toml_missing() {
        let result: Result<Sample> = load_toml(Path::new("/nonexistent.toml"));
        assert!(result.is_err());
    }
}
