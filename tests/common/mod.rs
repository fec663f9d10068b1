#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv_metagen::schema::Schema;
use tempfile::{TempDir, tempdir};

pub const SCENARIO_HEADINGS: [&str; 3] = ["file_name_1", "dc:title", "dc:subject"];

/// Schema shared by most scenarios: filename, title, and one merge target.
pub fn scenario_schema() -> Arc<Schema> {
    Arc::new(Schema::new(SCENARIO_HEADINGS).expect("scenario schema"))
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Writes raw bytes, for inputs that are not valid UTF-8.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents)
            .expect("write temp file contents");
        path
    }

    /// Writes a single-row headings file.
    pub fn headings(&self, fields: &[&str]) -> PathBuf {
        self.write("headings.csv", &format!("{}\n", fields.join(",")))
    }
}
