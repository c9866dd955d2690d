//! HTTP client that submits drawings for analysis.
//!
//! Talks to anything serving `POST /api/analyze`: the ChalkX proxy or the
//! backend itself.

use tracing::{debug, warn};

use crate::analysis::{interpret_reply, AnalysisError, AnalyzeRequest, ANALYZE_PATH};
use crate::board::Board;

/// Client for an analysis endpoint rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a client for `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Create a client that reuses an existing connection pool.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Full URL of the analyze route.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    /// Submit one image and wait for the analysis text.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<String, AnalysisError> {
        let url = self.endpoint();
        debug!(%url, image_len = request.image.len(), "submitting drawing");

        let response = self.http.post(&url).json(request).send().await.map_err(|e| {
            warn!(error = %e, %url, "analysis request failed");
            AnalysisError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, status, "failed to read analysis reply");
            AnalysisError::Transport(e.to_string())
        })?;
        debug!(status, body_len = body.len(), "analysis reply received");

        interpret_reply(status, &body)
    }

    /// Capture `board`, submit it, and store the outcome on the board.
    ///
    /// Returns without a request when the board is already analyzing.
    pub async fn analyze_board(&self, board: &mut Board) {
        let request = match board.begin_analysis() {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "analysis not started");
                return;
            }
        };
        let outcome = self.analyze(&request).await;
        board.finish_analysis(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_path() {
        assert_eq!(
            AnalysisClient::new("http://localhost:3000").endpoint(),
            "http://localhost:3000/api/analyze"
        );
        assert_eq!(
            AnalysisClient::new("http://backend:5000/").endpoint(),
            "http://backend:5000/api/analyze"
        );
    }

    /// URL of a loopback port nothing is listening on.
    async fn closed_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn direct_client(base_url: String) -> AnalysisClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        AnalysisClient::with_http(http, base_url)
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let client = direct_client(closed_url().await);
        let err = client.analyze(&AnalyzeRequest::new("aGVsbG8=")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
        assert!(err.to_string().starts_with("Failed to analyze image"));
    }

    #[tokio::test]
    async fn test_analyze_board_records_failure() {
        let client = direct_client(closed_url().await);
        let mut board = Board::new(16, 12);
        client.analyze_board(&mut board).await;
        assert!(!board.is_analyzing());
        assert!(board.error().is_some());
        assert!(board.result().is_none());
    }
}
