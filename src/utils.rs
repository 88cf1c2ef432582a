//! Utility functions for paths and time.

use std::path::PathBuf;

use chrono::Utc;

/// Joins a directory path and a file name.
///
/// # Examples
///
/// ```
/// let path = get_path("/var/lib/stars", "db.json");
/// assert_eq!(path, "/var/lib/stars/db.json");
/// ```
pub fn get_path(dir_path: &str, file_name: &str) -> String {
    let path_buf: PathBuf = [dir_path, file_name].iter().collect();
    path_buf.to_string_lossy().into_owned()
}

/// Current unix timestamp, in seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}
