//! Keyset cursor pagination for notification history.
//!
//! Identifiers are time-ordered, so "older than the cursor" is a plain
//! `id < cursor` comparison and pages are stable under concurrent inserts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page size.
pub const DEFAULT_LIMIT: i64 = 20;
/// Maximum page size.
pub const MAX_LIMIT: i64 = 100;

/// Parameters for one cursor page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CursorRequest {
    /// Last identifier seen by the client; the page starts strictly after it.
    pub last_id: Option<Uuid>,
    /// Requested page size.
    pub limit: i64,
    /// Restrict to notifications of one endpoint.
    pub endpoint_id: Option<Uuid>,
    /// Case-insensitive substring of the body.
    pub text: Option<String>,
}

impl CursorRequest {
    /// Create a request with a normalized limit.
    pub fn new(last_id: Option<Uuid>, limit: Option<i64>) -> Self {
        Self {
            last_id,
            limit: normalize_limit(limit),
            endpoint_id: None,
            text: None,
        }
    }

    /// Restrict the page to one endpoint.
    pub fn with_endpoint(mut self, endpoint_id: Option<Uuid>) -> Self {
        self.endpoint_id = endpoint_id;
        self
    }

    /// Restrict the page to bodies containing `text`. Blank input is ignored.
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.text = text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// The effective SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        normalize_limit(Some(self.limit))
    }
}

/// One page of results plus the cursor for the next call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    /// Items, newest first.
    pub items: Vec<T>,
    /// Identifier to pass as `last_id` for the following page.
    pub next_cursor: Option<Uuid>,
    /// Whether the page was full.
    pub has_more: bool,
}

impl<T> CursorPage<T> {
    /// Build a page; `cursor_of` extracts the identifier of an item.
    pub fn new(items: Vec<T>, limit: i64, cursor_of: impl Fn(&T) -> Uuid) -> Self {
        let next_cursor = items.last().map(&cursor_of);
        let has_more = i64::try_from(items.len()).is_ok_and(|n| n == limit);
        Self {
            items,
            next_cursor,
            has_more,
        }
    }

    /// Convert the items while keeping the cursor state.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

fn normalize_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_normalization() {
        assert_eq!(CursorRequest::new(None, None).limit(), DEFAULT_LIMIT);
        assert_eq!(CursorRequest::new(None, Some(0)).limit(), DEFAULT_LIMIT);
        assert_eq!(CursorRequest::new(None, Some(-3)).limit(), DEFAULT_LIMIT);
        assert_eq!(CursorRequest::new(None, Some(7)).limit(), 7);
        assert_eq!(CursorRequest::new(None, Some(500)).limit(), MAX_LIMIT);
    }

    #[test]
    fn test_blank_text_is_dropped() {
        let req = CursorRequest::new(None, None).with_text(Some("   ".into()));
        assert!(req.text.is_none());
        let req = CursorRequest::new(None, None).with_text(Some(" deploy ".into()));
        assert_eq!(req.text.as_deref(), Some("deploy"));
    }

    #[test]
    fn test_page_has_more_only_when_full() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::now_v7()).collect();
        let full = CursorPage::new(ids.clone(), 3, |id| *id);
        assert!(full.has_more);
        assert_eq!(full.next_cursor, Some(ids[2]));

        let short = CursorPage::new(ids[..2].to_vec(), 3, |id| *id);
        assert!(!short.has_more);

        let empty: CursorPage<Uuid> = CursorPage::new(Vec::new(), 3, |id| *id);
        assert!(!empty.has_more);
        assert!(empty.next_cursor.is_none());
    }
}
