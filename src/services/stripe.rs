use crate::config::PAGE_LIMIT;
use crate::error::AppError;
use crate::types::Invoice;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const STRIPE_API_BASE: &str = "https://api.stripe.com";
/// Pinned API version; invoice search payloads are stable within it.
const STRIPE_API_VERSION: &str = "2022-08-01";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One page of `GET /v1/invoices/search` results.
#[derive(Debug, Deserialize)]
struct SearchPage {
    data: Vec<Invoice>,
    has_more: bool,
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

pub struct StripeClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl StripeClient {
    /// Creates a client authenticated with the given secret key.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_token: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("invoicemeter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_token: api_token.into(),
            base_url: STRIPE_API_BASE.to_string(),
        })
    }

    /// Points the client at a different API host, e.g. a local stub server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches every invoice created after `period_since` (epoch seconds)
    /// with a positive total, following the search cursor until the
    /// provider reports no more pages. Records keep the provider's return
    /// order, concatenated across pages.
    ///
    /// # Errors
    /// Returns an error if any page request fails; partial progress is
    /// discarded.
    pub async fn fetch_invoices_since(&self, period_since: i64) -> Result<Vec<Invoice>, AppError> {
        let query = format!("created>{period_since} total>0");

        let mut all_invoices = Vec::new();
        let mut next_page: Option<String> = None;

        loop {
            let page = self.search_invoices(&query, next_page.as_deref()).await?;
            debug!(
                records = page.data.len(),
                has_more = page.has_more,
                "fetched invoice search page"
            );
            all_invoices.extend(page.data);

            if !page.has_more {
                break;
            }
            match page.next_page {
                Some(cursor) => next_page = Some(cursor),
                None => {
                    // No cursor to reach the claimed extra results; stop
                    // rather than refetch the same page forever.
                    warn!("search response set has_more without next_page, treating as exhausted");
                    break;
                }
            }
        }

        Ok(all_invoices)
    }

    async fn search_invoices(
        &self,
        query: &str,
        page: Option<&str>,
    ) -> Result<SearchPage, AppError> {
        let url = format!("{}/v1/invoices/search", self.base_url);
        let limit = PAGE_LIMIT.to_string();

        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .query(&[("query", query), ("limit", limit.as_str())]);

        if let Some(cursor) = page {
            request = request.query(&[("page", cursor)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map_or(body, |parsed| parsed.error.message);
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripeClient {
        StripeClient::new("sk_test_123")
            .expect("client should build")
            .with_base_url(server.uri())
    }

    fn invoice_json(total: i64) -> serde_json::Value {
        serde_json::json!({
            "status": "paid",
            "total": total,
            "amount_paid": total,
            "lines": {"data": [{}]}
        })
    }

    #[tokio::test]
    async fn test_single_page_fetch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/search"))
            .and(query_param("query", "created>1725163200 total>0"))
            .and(query_param("limit", "100"))
            .and(query_param_is_missing("page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [invoice_json(100), invoice_json(200)],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let invoices = client_for(&server)
            .fetch_invoices_since(1_725_163_200)
            .await
            .expect("fetch should succeed");

        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].total, 100);
        assert_eq!(invoices[1].total, 200);
    }

    #[tokio::test]
    async fn test_paginates_until_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/search"))
            .and(query_param_is_missing("page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [invoice_json(1), invoice_json(2)],
                "has_more": true,
                "next_page": "cursor_2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/search"))
            .and(query_param("page", "cursor_2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [invoice_json(3)],
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let invoices = client_for(&server)
            .fetch_invoices_since(1_725_163_200)
            .await
            .expect("fetch should succeed");

        // Cross-page order is the provider's return order.
        let totals: Vec<i64> = invoices.iter().map(|i| i.total).collect();
        assert_eq!(totals, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_has_more_without_cursor_stops() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [invoice_json(1)],
                "has_more": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let invoices = client_for(&server)
            .fetch_invoices_since(1_725_163_200)
            .await
            .expect("fetch should stop, not loop");

        assert_eq!(invoices.len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/search"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid API Key provided", "type": "invalid_request_error"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_invoices_since(1_725_163_200)
            .await
            .unwrap_err();

        match err {
            AppError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API Key"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/invoices/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_invoices_since(1_725_163_200)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Json(_)));
    }
}
