use crate::model::{list_key, ResponseEnvelope};
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page window taken from `page` / `pageSize` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Missing, non-numeric or zero values fall back to the defaults.
    #[must_use]
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self {
            page: positive(query.get("page")).unwrap_or(DEFAULT_PAGE),
            page_size: positive(query.get("pageSize")).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Items `[(page-1)*pageSize, page*pageSize)`; empty past the end.
    #[must_use]
    pub fn paginate(&self, items: &[Value]) -> Vec<Value> {
        items
            .iter()
            .skip(self.offset())
            .take(self.page_size)
            .cloned()
            .collect()
    }

    /// Slice `data.<entity>_list` of a stored list envelope.
    ///
    /// `total` and every other field are returned as stored. Envelopes without
    /// the list array are returned unchanged.
    #[must_use]
    pub fn apply(&self, envelope: &ResponseEnvelope, entity: &str) -> ResponseEnvelope {
        let mut page = envelope.clone();
        let key = list_key(entity);
        if let Some(Value::Array(items)) = page.data.get_mut(&key) {
            *items = self.paginate(items);
        }
        page
    }
}

fn positive(raw: Option<&String>) -> Option<usize> {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v >= 1)
}
