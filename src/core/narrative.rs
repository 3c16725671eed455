//! Narrative data model: the ordered list of timeline entries.
//!
//! A [`Narrative`] is built once at start-up (from a JSON file or the
//! built-in sample) and is never mutated afterwards.  Entries are sorted by
//! `sort_order` ascending and every `sort_order` must be unique, so it can
//! serve as the stable identity for per-entry state such as galleries.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identity of an entry (its `sort_order`).
pub type EntryKey = i64;

// ───────────────────────────────────────── entry ─────────────

/// One position / education / role in the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeEntry {
    pub sort_order: EntryKey,
    pub title: String,
    pub organization: String,
    pub date_range: String,
    /// Opaque style identifier; only the UI interprets it.
    #[serde(default)]
    pub color_token: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Opaque image references.  Zero images is valid (placeholder).
    #[serde(default)]
    pub images: Vec<String>,
}

impl NarrativeEntry {
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

// ───────────────────────────────────────── errors ────────────

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("duplicate sortOrder {0} in narrative data")]
    DuplicateSortOrder(EntryKey),
    #[error("failed to read narrative file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse narrative file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ───────────────────────────────────────── narrative ─────────

/// Immutable, sorted sequence of [`NarrativeEntry`] records.
#[derive(Debug, Clone, Default)]
pub struct Narrative {
    entries: Vec<NarrativeEntry>,
}

impl Narrative {
    /// Sort by `sort_order` and reject duplicates.
    pub fn new(mut entries: Vec<NarrativeEntry>) -> Result<Self, NarrativeError> {
        entries.sort_by_key(|e| e.sort_order);
        if let Some(dup) = entries
            .windows(2)
            .find(|w| w[0].sort_order == w[1].sort_order)
        {
            return Err(NarrativeError::DuplicateSortOrder(dup[0].sort_order));
        }
        Ok(Self { entries })
    }

    /// Load a JSON array of entries from disk.
    pub fn load(path: &Path) -> Result<Self, NarrativeError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| NarrativeError::Io {
            path: display.clone(),
            source,
        })?;
        let entries: Vec<NarrativeEntry> =
            serde_json::from_str(&raw).map_err(|source| NarrativeError::Parse {
                path: display,
                source,
            })?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[NarrativeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&NarrativeEntry> {
        self.entries.get(position)
    }

    /// Position (display index) of the entry with the given key.
    pub fn position_of(&self, key: EntryKey) -> Option<usize> {
        self.entries
            .binary_search_by_key(&key, |e| e.sort_order)
            .ok()
    }

    /// Built-in narrative used when no data file is given.
    pub fn sample() -> Self {
        let entry = |sort_order, title: &str, org: &str, dates: &str, color: &str, ach: &[&str], imgs: &[&str]| {
            NarrativeEntry {
                sort_order,
                title: title.into(),
                organization: org.into(),
                date_range: dates.into(),
                color_token: color.into(),
                achievements: ach.iter().map(|s| s.to_string()).collect(),
                images: imgs.iter().map(|s| s.to_string()).collect(),
            }
        };
        let entries = vec![
            entry(1, "Staff Engineer", "Lumen Labs", "2023 – present", "cyan",
                &["Led the platform rewrite", "Mentored six engineers"],
                &["/img/lumen/office.webp", "/img/lumen/team.webp", "/img/lumen/launch.webp"]),
            entry(2, "Senior Engineer", "Northwind", "2020 – 2023", "blue",
                &["Shipped realtime sync", "Cut p99 latency by 40%"],
                &["/img/northwind/board.webp", "/img/northwind/demo.webp"]),
            entry(3, "Software Engineer", "Harbor Analytics", "2018 – 2020", "green",
                &["Built the ingestion pipeline"],
                &["/img/harbor/dashboard.webp"]),
            entry(4, "Research Assistant", "State University", "2016 – 2018", "magenta",
                &["Published two papers on graph layouts"],
                &[]),
            entry(5, "B.Sc. Computer Science", "State University", "2012 – 2016", "yellow",
                &["Graduated with honours", "Robotics club lead"],
                &["/img/uni/campus.webp", "/img/uni/robot.webp", "/img/uni/grad.webp", "/img/uni/lab.webp"]),
        ];
        // Keys above are unique by construction.
        Self::new(entries).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(sort_order: EntryKey) -> NarrativeEntry {
        NarrativeEntry {
            sort_order,
            title: format!("entry {sort_order}"),
            organization: String::new(),
            date_range: String::new(),
            color_token: String::new(),
            achievements: Vec::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn entries_are_sorted_by_sort_order() {
        let n = Narrative::new(vec![bare(3), bare(1), bare(2)]).unwrap();
        let keys: Vec<_> = n.entries().iter().map(|e| e.sort_order).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        assert_eq!(n.position_of(3), Some(2));
        assert_eq!(n.position_of(9), None);
    }

    #[test]
    fn duplicate_sort_order_is_rejected() {
        let err = Narrative::new(vec![bare(1), bare(2), bare(1)]).unwrap_err();
        assert!(matches!(err, NarrativeError::DuplicateSortOrder(1)));
    }

    #[test]
    fn json_uses_camel_case_and_optional_lists() {
        let raw = r#"[{"sortOrder": 7, "title": "T", "organization": "O", "dateRange": "D"}]"#;
        let entries: Vec<NarrativeEntry> = serde_json::from_str(raw).unwrap();
        assert_eq!(entries[0].sort_order, 7);
        assert!(entries[0].images.is_empty());
        assert!(entries[0].achievements.is_empty());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Narrative::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, NarrativeError::Io { .. }));
    }

    #[test]
    fn sample_is_non_empty() {
        let n = Narrative::sample();
        assert_eq!(n.len(), 5);
        assert!(n.entries().iter().any(|e| e.images.is_empty()));
    }
}
