//! Filtering, sorting and pagination shared by every list view.
//!
//! Lists are fetched whole from the Catalog Store and narrowed here: a free-text search over a
//! fixed set of fields, exact-match filters where `"all"` (or nothing) disables the filter, a
//! stable sort on one date field and a fixed-size page slice.

use std::cmp::Ordering;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::core::library::PaginatedResult;

const MAX_PAGES_SHOWN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Status,
    Category,
    Author,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub sort: SortOrder,
    pub page: usize,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn search_term(&self) -> Option<String> {
        self.search.as_ref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    // None means "all"
    pub fn filter(&self, field: FilterField) -> Option<&str> {
        let raw = match field {
            FilterField::Status => self.status.as_deref(),
            FilterField::Category => self.category.as_deref(),
            FilterField::Author => self.author.as_deref(),
        };
        raw.map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
    }
}

pub trait Listable {
    // fields the free-text search looks at
    fn search_fields(&self) -> Vec<Option<&str>>;

    // the date field the list is ordered by
    fn sort_date(&self) -> Option<NaiveDate>;

    fn filter_value(&self, _field: FilterField) -> Option<String> {
        None
    }
}

pub fn matches_search<T: Listable>(record: &T, term: Option<&str>) -> bool {
    match term {
        None => true,
        Some(term) => record.search_fields().into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(term)),
    }
}

pub fn matches_filters<T: Listable>(record: &T, query: &ListQuery) -> bool {
    [FilterField::Status, FilterField::Category, FilterField::Author].iter().all(|field| {
        match query.filter(*field) {
            None => true,
            Some(expected) => record.filter_value(*field)
                .map(|actual| actual.to_lowercase() == expected.to_lowercase())
                .unwrap_or(false),
        }
    })
}

// Stable: records with equal dates keep their input order in both directions.
pub fn sort_by_date<T, F>(records: &mut [T], order: SortOrder, key: F)
    where F: Fn(&T) -> Option<NaiveDate> {
    records.sort_by(|a, b| compare_dates(key(a), key(b), order));
}

pub(crate) fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => a.cmp(&b),
        SortOrder::Desc => b.cmp(&a),
    }
}

pub fn page_window(current: usize, page_count: usize) -> Vec<usize> {
    if page_count <= 1 {
        return vec![];
    }
    if page_count <= MAX_PAGES_SHOWN {
        return (0..page_count).collect();
    }
    let half = MAX_PAGES_SHOWN / 2;
    let start = if current <= half {
        0
    } else if current >= page_count - half - 1 {
        page_count - MAX_PAGES_SHOWN
    } else {
        current - half
    };
    (start..start + MAX_PAGES_SHOWN).collect()
}

pub fn paginate<T>(records: Vec<T>, page: usize, page_size: usize) -> PaginatedResult<T> {
    let page_size = page_size.max(1);
    let total = records.len();
    let page_count = (total + page_size - 1) / page_size;
    let page = if page_count == 0 { 0 } else { page.min(page_count - 1) };
    let records: Vec<T> = records.into_iter().skip(page * page_size).take(page_size).collect();
    PaginatedResult::new(page, page_size, page_count, total, page_window(page, page_count), records)
}

pub fn apply<T: Listable + Clone>(records: &[T], query: &ListQuery, page_size: usize) -> PaginatedResult<T> {
    let term = query.search_term();
    let mut selected: Vec<T> = records.iter()
        .filter(|r| matches_search(*r, term.as_deref()))
        .filter(|r| matches_filters(*r, query))
        .cloned()
        .collect();
    sort_by_date(&mut selected, query.sort, |r| r.sort_date());
    paginate(selected, query.page, page_size)
}
