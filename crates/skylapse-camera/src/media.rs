//! ---
//! sl_section: "04-device"
//! sl_subsection: "module"
//! sl_type: "source"
//! sl_scope: "code"
//! sl_description: "Camera control contract, media listing and the HTTP backend."
//! sl_version: "v0.0.0-prealpha"
//! sl_owner: "tbd"
//! ---
//! Media listing as reported by the camera.
//!
//! The camera groups burst and timelapse frames into ranges (`g`, `b`, `l`)
//! instead of listing every file. Ranges are expanded into individual
//! filenames just before retrieval and never cached across sessions.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// A contiguous run of camera-resident files sharing one group header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub header: u32,
    pub first: u32,
    pub last: u32,
}

impl MediaItem {
    /// Filenames covered by this range, in index order.
    pub fn filenames(&self) -> impl Iterator<Item = String> + '_ {
        (self.first..=self.last).map(move |index| format!("G{:03}{:04}.JPG", self.header, index))
    }

    pub fn len(&self) -> usize {
        if self.last < self.first {
            0
        } else {
            (self.last - self.first) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything stored under one DCIM directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDirectory {
    pub directory: String,
    pub ranges: Vec<MediaItem>,
    /// Ungrouped files, listed by name.
    pub files: Vec<String>,
}

impl MediaDirectory {
    /// Every filename in this directory: expanded ranges first, then singles.
    pub fn filenames(&self) -> Vec<String> {
        self.ranges
            .iter()
            .flat_map(MediaItem::filenames)
            .chain(self.files.iter().cloned())
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.ranges.iter().map(MediaItem::len).sum::<usize>() + self.files.len()
    }
}

/// Wire format of the media list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaList {
    #[serde(default)]
    pub media: Vec<MediaListDirectory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListDirectory {
    #[serde(rename = "d")]
    pub directory: String,
    #[serde(rename = "fs", default)]
    pub entries: Vec<MediaListEntry>,
}

/// One entry of a directory listing. Grouped entries carry `g`/`b`/`l`,
/// which the camera reports either as numbers or as numeric strings.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct MediaListEntry {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "g")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub group: Option<u32>,
    #[serde(rename = "b")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub first: Option<u32>,
    #[serde(rename = "l")]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub last: Option<u32>,
}

impl MediaList {
    pub fn into_directories(self) -> Vec<MediaDirectory> {
        self.media
            .into_iter()
            .map(|listing| {
                let mut directory = MediaDirectory {
                    directory: listing.directory,
                    ..MediaDirectory::default()
                };
                for entry in listing.entries {
                    match (entry.group, entry.first, entry.last) {
                        (Some(header), Some(first), Some(last)) => {
                            directory.ranges.push(MediaItem { header, first, last })
                        }
                        _ => directory.files.push(entry.name),
                    }
                }
                directory
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_expands_to_padded_filenames() {
        let item = MediaItem {
            header: 1,
            first: 998,
            last: 1001,
        };
        let names: Vec<_> = item.filenames().collect();
        assert_eq!(
            names,
            vec!["G0010998.JPG", "G0010999.JPG", "G0011000.JPG", "G0011001.JPG"]
        );
        assert_eq!(item.len(), 4);
    }

    #[test]
    fn inverted_range_is_empty() {
        let item = MediaItem {
            header: 2,
            first: 10,
            last: 9,
        };
        assert!(item.is_empty());
        assert_eq!(item.filenames().count(), 0);
    }

    #[test]
    fn parses_string_and_numeric_groups() {
        let body = r#"{
            "id": "123",
            "media": [
                {"d": "100GOPRO", "fs": [
                    {"n": "G0010001.JPG", "g": "1", "b": "1", "l": "3", "s": "1200"},
                    {"n": "GOPR0004.MP4", "s": "80000"}
                ]},
                {"d": "101GOPRO", "fs": [
                    {"n": "G0020001.JPG", "g": 2, "b": 1, "l": 2}
                ]}
            ]
        }"#;
        let list: MediaList = serde_json::from_str(body).expect("media list parses");
        let directories = list.into_directories();
        assert_eq!(directories.len(), 2);

        assert_eq!(directories[0].directory, "100GOPRO");
        assert_eq!(
            directories[0].filenames(),
            vec!["G0010001.JPG", "G0010002.JPG", "G0010003.JPG", "GOPR0004.MP4"]
        );
        assert_eq!(directories[0].file_count(), 4);

        assert_eq!(
            directories[1].ranges,
            vec![MediaItem {
                header: 2,
                first: 1,
                last: 2
            }]
        );
    }

    #[test]
    fn empty_listing_has_no_directories() {
        let list: MediaList = serde_json::from_str(r#"{"id": "1", "media": []}"#).unwrap();
        assert!(list.into_directories().is_empty());
    }
}
