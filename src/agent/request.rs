//! Query request body.

use serde::{Deserialize, Serialize};

/// Conventional endpoint for agent queries.
pub const QUERY_STREAM_ENDPOINT: &str = "/query/stream";

/// Body posted to the query stream endpoint.
///
/// `session_id` is `null` on the first turn and the id from the previous
/// turn's `done` event afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub session_id: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: None,
        }
    }

    /// Continue an existing conversation.
    pub fn with_session(mut self, session_id: Option<String>) -> Self {
        self.session_id = session_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_turn_serializes_null_session() {
        let body = serde_json::to_string(&QueryRequest::new("who maintains tokio?")).unwrap();
        assert_eq!(body, r#"{"query":"who maintains tokio?","session_id":null}"#);
    }

    #[test]
    fn test_continuation_carries_session() {
        let request = QueryRequest::new("and serde?").with_session(Some("s-42".to_string()));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["session_id"], "s-42");
    }
}
