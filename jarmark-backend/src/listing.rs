//! Search, sort and pagination of the admin table. Everything runs over a
//! snapshot of the store.

use jarmark_database::models::SubmissionRecord;
use serde::{Deserialize, Serialize};

pub const ENTRIES_PER_PAGE: [usize; 4] = [25, 50, 100, 200];
pub const DEFAULT_ENTRIES_PER_PAGE: usize = 25;

pub const EMPTY_STORE: &str =
    "Brak zgłoszeń w systemie. Kiedy formularz zostanie wypełniony, zgłoszenia pojawią się tutaj.";
pub const NO_RESULTS: &str = "Brak wyników dla podanego wyszukiwania.";

/// Above this many pages the navigation collapses into a window with ellipses.
const FULL_PAGINATION_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query string of `/admin`. Unparseable numbers fall back to the defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub q: String,
    #[serde(deserialize_with = "lenient_sort")]
    pub sort: SortDirection,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

fn lenient_sort<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<SortDirection, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(if raw.eq_ignore_ascii_case("asc") {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    })
}

impl ListingQuery {
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse().ok())
            .unwrap_or(1)
    }

    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
            .as_deref()
            .and_then(|per_page| per_page.trim().parse().ok())
            .filter(|per_page| ENTRIES_PER_PAGE.contains(per_page))
            .unwrap_or(DEFAULT_ENTRIES_PER_PAGE)
    }

    /// Query string for the same listing with other values filled in.
    #[must_use]
    pub fn to_query(&self, sort: SortDirection, page: usize, per_page: usize) -> String {
        let mut pairs = vec![
            ("sort", sort.as_str().to_owned()),
            ("page", page.to_string()),
            ("perPage", per_page.to_string()),
        ];
        if !self.q.is_empty() {
            pairs.insert(0, ("q", self.q.clone()));
        }
        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }
}

/// Case-insensitive substring match over the searchable columns.
#[must_use]
pub fn matches(record: &SubmissionRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    let s = &record.submission;
    [
        s.company_name.as_str(),
        &s.first_name,
        &s.last_name,
        &s.email,
        &s.phone,
        s.category.label(),
        &s.products,
        &s.location1,
        &s.location2,
        &s.location3,
    ]
    .iter()
    .any(|value| value.to_lowercase().contains(&query))
}

#[must_use]
pub fn filter(records: Vec<SubmissionRecord>, query: &str) -> Vec<SubmissionRecord> {
    records
        .into_iter()
        .filter(|record| matches(record, query))
        .collect()
}

/// Stable, so records stamped within the same second keep insertion order.
pub fn sort(records: &mut [SubmissionRecord], direction: SortDirection) {
    match direction {
        SortDirection::Asc => {
            records.sort_by(|a, b| a.submission_date_time.cmp(&b.submission_date_time));
        }
        SortDirection::Desc => {
            records.sort_by(|a, b| b.submission_date_time.cmp(&a.submission_date_time));
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRow {
    pub number: usize,
    pub record: SubmissionRecord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub rows: Vec<ListingRow>,
    /// Records in the store before filtering.
    pub store_total: usize,
    /// Records matching the search.
    pub matching: usize,
    pub page: usize,
    pub total_pages: usize,
    pub per_page: usize,
    pub sort: SortDirection,
}

impl Listing {
    /// Text shown instead of the table, if any.
    #[must_use]
    pub const fn empty_message(&self) -> Option<&'static str> {
        if self.store_total == 0 {
            Some(EMPTY_STORE)
        } else if self.matching == 0 {
            Some(NO_RESULTS)
        } else {
            None
        }
    }

    #[must_use]
    pub fn page_items(&self) -> Vec<PageItem> {
        page_items(self.page, self.total_pages)
    }
}

#[must_use]
pub fn build_listing(records: Vec<SubmissionRecord>, query: &ListingQuery) -> Listing {
    let store_total = records.len();
    let mut matching = filter(records, &query.q);
    sort(&mut matching, query.sort);

    let per_page = query.per_page();
    let total_pages = matching.len().div_ceil(per_page).max(1);
    let page = query.page().clamp(1, total_pages);
    let offset = (page - 1) * per_page;
    let matching_count = matching.len();

    let rows = matching
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(per_page)
        .map(|(index, record)| ListingRow {
            number: index + 1,
            record,
        })
        .collect();

    Listing {
        rows,
        store_total,
        matching: matching_count,
        page,
        total_pages,
        per_page,
        sort: query.sort,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Page links around `current`: always the first and last page, a window of
/// neighbours, and an ellipsis wherever pages are skipped.
#[must_use]
pub fn page_items(current: usize, total: usize) -> Vec<PageItem> {
    if total <= FULL_PAGINATION_LIMIT {
        return (1..=total).map(PageItem::Page).collect();
    }
    let mut start = current.saturating_sub(1).max(2);
    let mut end = (current + 1).min(total - 1);
    if current <= 3 {
        end = 4_usize.min(total - 1);
    }
    if current >= total - 2 {
        start = (total - 3).max(2);
    }

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}
