//! Scraped university records

use crate::digest::short_hash;
use serde::{Deserialize, Serialize};
use url::Url;

/// One institution as written to the data file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    /// Short SHA-256 of the name
    pub id: String,
    pub name: String,
    pub score: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuition_fee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub programs: Option<Vec<Program>>,
}

impl University {
    /// Build a record from a ranking row and its detail page data
    pub fn from_parts(row: RankingRow, detail: DetailData) -> Self {
        let (city, country) = split_location(&row.location);
        Self {
            id: short_hash(&row.name),
            name: row.name,
            score: row.score,
            city,
            country,
            tuition_fee: detail.tuition_fee,
            programs: detail.programs,
        }
    }
}

/// A program (faculty) tab on the detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub courses: Vec<Course>,
}

/// A course within a program, with its degrees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub degrees: Vec<String>,
}

/// One row of a ranking page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    /// Position on its page, zero-based
    pub position: usize,
    pub name: String,
    pub score: String,
    pub location: String,
    /// Absolute URL of the detail page
    pub detail_url: Option<Url>,
}

/// Data extracted from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailData {
    pub tuition_fee: Option<String>,
    /// `None` when the page has no program panes
    pub programs: Option<Vec<Program>>,
}

/// Split `City, Country` positionally into its first two trimmed parts.
///
/// An empty part yields `None` in its position, so `",France"` has no city
/// and `"a,,b"` has no country.
pub fn split_location(location: &str) -> (Option<String>, Option<String>) {
    let mut parts = location
        .split(',')
        .map(str::trim)
        .map(|part| (!part.is_empty()).then(|| part.to_string()));
    let city = parts.next().flatten();
    let country = parts.next().flatten();
    (city, country)
}
