//! Capability-based helpers for reading the engine's JSON inputs.
#![forbid(unsafe_code)]

use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while loading a JSON document from disk.
#[derive(Debug, Error)]
pub enum JsonFileError {
    /// The file could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        /// File that was requested.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file contents are not the expected JSON document.
    #[error("failed to parse JSON in {path:?}: {source}")]
    Parse {
        /// File that was read.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
}

impl JsonFileError {
    /// Path of the file that failed to load.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Open { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Return whether a path exists and is a regular file.
///
/// A missing path surfaces as an [`io::ErrorKind::NotFound`] error so callers
/// can tell it apart from a directory.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Decode the JSON document stored at `path`.
pub fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, JsonFileError> {
    let file = open_utf8_file(path).map_err(|source| JsonFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| JsonFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Workspace {
        fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
            let path = self.root.join(name);
            fs::write(&path, contents).expect("write fixture file");
            path
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        Workspace { _dir: dir, root }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        points: u32,
    }

    #[rstest]
    fn file_is_file_distinguishes_files_and_directories(workspace: Workspace) {
        let file = workspace.write("catalog.json", "{}");
        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&workspace.root).expect("inspect directory"));
    }

    #[rstest]
    fn file_is_file_reports_missing_paths(workspace: Workspace) {
        let err = file_is_file(&workspace.root.join("missing.json")).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn read_json_decodes_documents(workspace: Workspace) {
        let path = workspace.write("sample.json", r#"{"name": "Bronx Zoo", "points": 12}"#);
        let sample: Sample = read_json(&path).expect("decode");
        assert_eq!(
            sample,
            Sample {
                name: "Bronx Zoo".to_owned(),
                points: 12
            }
        );
    }

    #[rstest]
    fn read_json_reports_parse_failures_with_the_path(workspace: Workspace) {
        let path = workspace.write("broken.json", "{ not json");
        let err = read_json::<Sample>(&path).expect_err("invalid JSON");
        assert!(matches!(err, JsonFileError::Parse { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[rstest]
    fn read_json_reports_missing_files(workspace: Workspace) {
        let path = workspace.root.join("absent.json");
        let err = read_json::<Sample>(&path).expect_err("missing file");
        assert!(matches!(err, JsonFileError::Open { .. }));
    }
}
