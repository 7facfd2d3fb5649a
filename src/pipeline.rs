use crate::catalog::GameRecord;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Records shown per page of the grid.
pub const PAGE_SIZE: usize = 6;

/// Orderings offered by the sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    TitleAsc,
    TitleDesc,
    YearDesc,
    YearAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [Self::TitleAsc, Self::TitleDesc, Self::YearDesc, Self::YearAsc];

    /// Parse a selector value. Unknown values yield `None`, which sorts nothing.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "title_asc" | "titulo_asc" => Some(Self::TitleAsc),
            "title_desc" | "titulo_desc" => Some(Self::TitleDesc),
            "year_desc" | "ano_desc" => Some(Self::YearDesc),
            "year_asc" | "ano_asc" => Some(Self::YearAsc),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TitleAsc => "Title A-Z",
            Self::TitleDesc => "Title Z-A",
            Self::YearDesc => "Newest first",
            Self::YearAsc => "Oldest first",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Active predicates. `None` means the selector is left at "Any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub text: String,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub year: Option<i32>,
}

impl FilterQuery {
    fn matches(&self, record: &GameRecord, needle: &str) -> bool {
        matches_text(record, needle)
            && self.genre.as_ref().is_none_or(|g| record.genre == *g)
            && self.platform.as_ref().is_none_or(|p| record.platform == *p)
            && self.year.is_none_or(|y| record.year == y)
    }
}

/// Case-insensitive substring match over title, description, developer
/// and the space-joined tags. `needle` must already be lower-cased.
fn matches_text(record: &GameRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.title.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record.developer.to_lowercase().contains(needle)
        || record.tags.join(" ").to_lowercase().contains(needle)
}

/// Collation key: canonical decomposition with combining marks dropped,
/// lower-cased. "Ōkami" and "okami" share a key.
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Title comparison that ignores accents and case first, then case only,
/// then falls back to the raw strings so distinct titles never compare equal.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Filter then sort. Returns indices into `records`, in display order.
///
/// Never fails: an empty catalog or no matches gives an empty vector.
/// A `None` sort key keeps catalog order.
pub fn run(records: &[GameRecord], query: &FilterQuery, sort: Option<SortKey>) -> Vec<usize> {
    let needle = query.text.trim().to_lowercase();

    let mut indices: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| query.matches(record, &needle))
        .map(|(i, _)| i)
        .collect();

    if let Some(key) = sort {
        sort_indices(records, &mut indices, key);
    }
    indices
}

/// Stable sort of `indices` by `key`.
pub fn sort_indices(records: &[GameRecord], indices: &mut [usize], key: SortKey) {
    match key {
        SortKey::TitleAsc => {
            indices.sort_by(|&a, &b| compare_titles(&records[a].title, &records[b].title))
        }
        SortKey::TitleDesc => {
            indices.sort_by(|&a, &b| compare_titles(&records[b].title, &records[a].title))
        }
        SortKey::YearDesc => indices.sort_by(|&a, &b| records[b].year.cmp(&records[a].year)),
        SortKey::YearAsc => indices.sort_by(|&a, &b| records[a].year.cmp(&records[b].year)),
    }
}

// ── Pagination ──

/// Number of pages needed for `count` records (0 when empty).
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Slice bounds of a 1-based `page`, clamped to `count`.
pub fn page_range(count: usize, page: usize) -> Range<usize> {
    let start = (page.saturating_sub(1) * PAGE_SIZE).min(count);
    let end = (start + PAGE_SIZE).min(count);
    start..end
}
