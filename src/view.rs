//! Pure mapping from records to what the UI draws.
//!
//! Nothing here touches the terminal, so the grid and overlay contents can
//! be checked without a backend.

use crate::catalog::GameRecord;

/// Description characters kept on a card before the ellipsis.
pub const EXCERPT_CHARS: usize = 100;

/// Shown in place of the grid when no record passes the filters.
pub const NO_RESULTS_NOTICE: &str = "No games found.";

/// One card in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub excerpt: String,
    /// "genre • year"
    pub summary: String,
    pub cover: String,
}

impl CardView {
    pub fn from_record(record: &GameRecord) -> Self {
        Self {
            title: record.title.clone(),
            excerpt: excerpt(&record.description),
            summary: format!("{} • {}", record.genre, record.year),
            cover: record.cover.clone(),
        }
    }
}

/// First [`EXCERPT_CHARS`] characters followed by "...". The ellipsis is
/// appended even when nothing was cut.
pub fn excerpt(description: &str) -> String {
    let mut out: String = description.chars().take(EXCERPT_CHARS).collect();
    out.push_str("...");
    out
}

/// Every field of a record, formatted for the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub cover: String,
    pub genre: String,
    pub platform: String,
    pub year: String,
    pub developer: String,
    pub description: String,
    pub tags: String,
}

impl DetailView {
    pub fn from_record(record: &GameRecord) -> Self {
        Self {
            title: record.title.clone(),
            cover: record.cover.clone(),
            genre: record.genre.clone(),
            platform: record.platform.clone(),
            year: record.year.to_string(),
            developer: record.developer.clone(),
            description: record.description.clone(),
            tags: record.tags.join(", "),
        }
    }
}

/// What the card area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    /// The catalog never loaded. No pagination.
    LoadFailed { notice: String },
    /// Nothing matches. No pagination.
    Empty { notice: String },
    /// One page of cards plus one pagination button per page.
    Page {
        cards: Vec<CardView>,
        page: usize,
        total_pages: usize,
        selected: usize,
    },
}

impl GridView {
    pub fn page_buttons(&self) -> usize {
        match self {
            Self::Page { total_pages, .. } => *total_pages,
            _ => 0,
        }
    }
}
