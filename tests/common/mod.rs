//! Common test utilities for Bookbot integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary working directory for integration tests
pub struct TestWorkdir {
    /// Temporary directory, removed on drop
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the directory root
    pub path: PathBuf,
}

impl TestWorkdir {
    /// Create a new test working directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file under the working directory
    #[allow(dead_code)]
    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.path.join(name), content).expect("Failed to write file");
    }

    /// Read a file from the working directory
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path.join(name)).expect("Failed to read file")
    }

    /// Check if a file exists in the working directory
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).exists()
    }
}

/// A complete, valid bookbot.json body for tests that need one
#[allow(dead_code)]
pub fn valid_config_body(base_url: &str) -> String {
    format!(
        r#"{{
  "base_url": "{base_url}",
  "venue_id": "v1",
  "user_id": "u9",
  "cookies": "session=abc; csrf=def",
  "token": "tok123",
  "spaces": {{ "1": "Spot 1", "2": "Spot 2" }},
  "timezone": "Australia/Melbourne",
  "days_ahead": 14
}}"#
    )
}
