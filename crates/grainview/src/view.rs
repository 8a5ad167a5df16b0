//! Tabular view pipeline.
//!
//! Derives the rows of one table page from the full sample collection:
//! text search, then category filter, then a stable sort, then pagination.
//! Every stage borrows from the source; nothing here mutates a [`Sample`].

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sample::Sample;

/// Rows per page in the sample table.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Sentinel accepted for "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Field the table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Location name, lexicographic.
    Location,
    /// Collection time, chronological.
    #[default]
    Timestamp,
    /// Grain size, numeric.
    GrainSize,
    /// Temperature, numeric.
    Temperature,
    /// Humidity, numeric.
    Humidity,
}

impl SortKey {
    /// Compare two samples on this key, in ascending order.
    #[must_use]
    pub fn compare(self, a: &Sample, b: &Sample) -> Ordering {
        match self {
            Self::Location => a.location.cmp(&b.location),
            Self::Timestamp => a.timestamp.cmp(&b.timestamp),
            Self::GrainSize => a.grain_size.total_cmp(&b.grain_size),
            Self::Temperature => a.temperature.total_cmp(&b.temperature),
            Self::Humidity => a.humidity.total_cmp(&b.humidity),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Location => write!(f, "location"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::GrainSize => write!(f, "grain_size"),
            Self::Temperature => write!(f, "temperature"),
            Self::Humidity => write!(f, "humidity"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Increasing order.
    #[serde(rename = "asc")]
    Ascending,
    /// Decreasing order.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Category ("beach type") filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every category passes.
    #[default]
    All,
    /// Only this exact category passes (case-sensitive).
    Only(String),
}

impl CategoryFilter {
    /// Whether a sample's category passes.
    #[must_use]
    pub fn matches(&self, sample: &Sample) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => sample.beach_type == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(s.to_string())
        })
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_CATEGORIES}"),
            Self::Only(category) => write!(f, "{category}"),
        }
    }
}

/// User-controlled view parameters for one viewing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewParams {
    /// Free-text search over location and device id.
    pub query: String,
    /// Category filter.
    pub category: CategoryFilter,
    /// Sort field.
    pub sort_key: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
    /// 1-based page number.
    pub page: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: CategoryFilter::All,
            sort_key: SortKey::Timestamp,
            direction: SortDirection::Descending,
            page: 1,
        }
    }
}

impl ViewParams {
    /// Select a sort column the way a header click does.
    ///
    /// Clicking the active column flips the direction; clicking another
    /// column selects it ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.direction = self.direction.reversed();
        } else {
            self.sort_key = key;
            self.direction = SortDirection::Ascending;
        }
    }

    /// Select a sort column from explicit input.
    ///
    /// A given direction always wins. Without one, a different column is
    /// selected ascending as with [`ViewParams::toggle_sort`], and the
    /// active column keeps its direction.
    pub fn select_sort(&mut self, key: SortKey, direction: Option<SortDirection>) {
        if self.sort_key != key {
            self.toggle_sort(key);
        }
        if let Some(direction) = direction {
            self.direction = direction;
        }
    }

    /// Clamp the page into `[1, total_pages]`.
    ///
    /// Returns `true` if the page had to change.
    pub fn clamp_page(&mut self, total_pages: usize) -> bool {
        let clamped = self.page.clamp(1, total_pages.max(1));
        let changed = clamped != self.page;
        self.page = clamped;
        changed
    }

    /// Whether a sample passes both the text and the category filter.
    #[must_use]
    pub fn matches(&self, sample: &Sample) -> bool {
        matches_query(sample, &self.query.to_lowercase()) && self.category.matches(sample)
    }
}

fn matches_query(sample: &Sample, needle: &str) -> bool {
    needle.is_empty()
        || sample.location.to_lowercase().contains(needle)
        || sample.device_id.to_lowercase().contains(needle)
}

/// One page of the derived table.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewPage<'a> {
    /// Rows on this page, in display order.
    pub records: Vec<&'a Sample>,
    /// Number of samples passing the filters.
    pub total_filtered: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
    /// The page that was requested.
    pub page: usize,
}

/// Number of pages needed for `count` rows; at least 1.
#[must_use]
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Apply the search and category filters, keeping source order.
#[must_use]
pub fn filter<'a>(samples: &'a [Sample], params: &ViewParams) -> Vec<&'a Sample> {
    let needle = params.query.to_lowercase();
    samples
        .iter()
        .filter(|s| matches_query(s, &needle) && params.category.matches(s))
        .collect()
}

/// Stable sort of borrowed samples; ties keep their relative order.
pub fn sort(records: &mut [&Sample], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| direction.apply(key.compare(a, b)));
}

/// The slice of `records` shown on `page` (1-based).
///
/// Out-of-range pages, including page 0, produce an empty slice.
#[must_use]
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
        .filter(|start| *start < records.len())
    else {
        return &[];
    };
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Run the whole pipeline: filter, sort, paginate.
///
/// The page is not clamped; see [`ViewParams::clamp_page`].
#[must_use]
pub fn apply<'a>(samples: &'a [Sample], params: &ViewParams, page_size: usize) -> ViewPage<'a> {
    let mut filtered = filter(samples, params);
    sort(&mut filtered, params.sort_key, params.direction);

    let total_filtered = filtered.len();
    ViewPage {
        records: paginate(&filtered, params.page, page_size).to_vec(),
        total_filtered,
        total_pages: total_pages(total_filtered, page_size),
        page: params.page,
    }
}
