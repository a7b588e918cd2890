//! Cursor pagination query parameters.

use serde::Deserialize;
use uuid::Uuid;

use torchi_core::types::CursorRequest;

/// Query parameters for notification history.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CursorParams {
    /// Last notification id the client has seen.
    pub cursor: Option<Uuid>,
    /// Page size.
    pub limit: Option<i64>,
    /// Only notifications of this endpoint.
    pub endpoint_id: Option<Uuid>,
    /// Body search text.
    pub q: Option<String>,
}

impl CursorParams {
    /// Convert to a domain `CursorRequest`.
    pub fn into_cursor_request(self) -> CursorRequest {
        CursorRequest::new(self.cursor, self.limit)
            .with_endpoint(self.endpoint_id)
            .with_text(self.q)
    }
}
