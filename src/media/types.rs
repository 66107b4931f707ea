//! Media collection types

use serde::{Deserialize, Serialize};

/// Institution to collect media for. Other fields of the data file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTarget {
    pub id: String,
    pub name: String,
}

/// Saved image URLs of one institution, as written to `urls.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: String,
    pub name: String,
    /// Logo URLs whose download succeeded, in search order
    pub logo: Vec<String>,
    /// Campus image URLs whose download succeeded, in search order
    pub images: Vec<String>,
}

impl MediaEntry {
    /// CSV columns
    pub const CSV_HEADER: [&'static str; 4] = ["id", "name", "logo", "images"];

    /// One CSV row; URL lists are JSON arrays
    pub fn csv_row(&self) -> serde_json::Result<Vec<String>> {
        Ok(vec![
            self.id.clone(),
            self.name.clone(),
            serde_json::to_string(&self.logo)?,
            serde_json::to_string(&self.images)?,
        ])
    }
}

/// What an image search looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Logo,
    Campus,
}

impl ImageKind {
    /// Search query for an institution
    pub fn query(self, name: &str) -> String {
        match self {
            ImageKind::Logo => format!("logo of {name} college"),
            ImageKind::Campus => format!("{name} college"),
        }
    }

    /// Subdirectory under `<image_root>/<id>/`
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageKind::Logo => "logos",
            ImageKind::Campus => "images",
        }
    }

    /// File name of the `index`-th result, counting from 1
    pub fn file_name(self, name: &str, index: usize) -> String {
        match self {
            ImageKind::Logo => format!("logo_{index}.jpg"),
            ImageKind::Campus => format!("{}_{index}.jpg", file_stem(name)),
        }
    }
}

/// Institution name made safe for use as a file name
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '(' | ')' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "image".to_string()
    } else {
        stem.to_string()
    }
}

/// Image search API response
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub value: Vec<ImageResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageResult {
    #[serde(rename = "contentUrl")]
    pub content_url: String,
}
