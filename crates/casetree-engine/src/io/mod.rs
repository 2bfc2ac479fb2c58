use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a whole file as bytes
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(IoError::Io)
}

/// Write bytes to a file, creating parent directories as needed
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, bytes).map_err(IoError::Io)?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty-printed JSON
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| IoError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_bytes(path, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TestCaseRecord;
    use crate::tests::{create_test_dir, create_test_file};

    #[test]
    fn test_read_bytes_missing_file() {
        let dir = create_test_dir();
        let missing = dir.path().join("nope.json");

        let result = read_bytes(&missing);
        assert!(matches!(result, Err(IoError::NotFound(path)) if path == missing));
    }

    #[test]
    fn test_write_bytes_creates_parent_dirs() {
        let dir = create_test_dir();
        let path = dir.path().join("exports").join("nested").join("out.csv");

        write_bytes(&path, b"a,b\n").unwrap();
        assert_eq!(read_bytes(&path).unwrap(), b"a,b\n");
    }

    #[test]
    fn test_json_round_trip() {
        let dir = create_test_dir();
        let path = dir.path().join("cases.json");
        let cases = vec![TestCaseRecord::new("Login").with_module(3)];

        write_json(&path, &cases).unwrap();
        let back: Vec<TestCaseRecord> = read_json(&path).unwrap();
        assert_eq!(back, cases);
    }

    #[test]
    fn test_read_json_reports_path() {
        let dir = create_test_dir();
        let path = create_test_file(&dir, "broken.json", "[{");

        match read_json::<Vec<TestCaseRecord>>(&path) {
            Err(IoError::Json { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected Json error, got {other:?}"),
        }
    }
}
