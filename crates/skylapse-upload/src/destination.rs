//! ---
//! sl_section: "05-upload"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Cloud upload of staged media with bounded concurrency."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Remote folder for one capture: `root/YYYY/MM Month/D/label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteDestination {
    path: String,
}

impl RemoteDestination {
    pub fn new(root: &str, date: NaiveDate, label: &str) -> Self {
        let joined = format!(
            "{}/{}/{}/{}/{}",
            root,
            date.year(),
            date.format("%m %B"),
            date.day(),
            label
        );
        Self {
            path: normalize(&joined),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Remote path of `filename` inside this folder.
    pub fn join(&self, filename: &str) -> String {
        if self.path.ends_with('/') {
            format!("{}{}", self.path, filename)
        } else {
            format!("{}/{}", self.path, filename)
        }
    }
}

impl fmt::Display for RemoteDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Collapse repeated separators and resolve `.`/`..` segments.
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().map_or(false, |last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let body = segments.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_owned(),
        (false, false) => body,
    }
}
