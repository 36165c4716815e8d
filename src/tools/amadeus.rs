//! Amadeus OAuth2 token fetch, shared by the flight and hotel tools
//!
//! Amadeus hands out short-lived bearer tokens via the client-credentials
//! grant. One token is fetched per tool invocation; there is no caching.

use serde_json::Value;

use super::ToolContext;
use crate::error::{Result, TriprError};

/// Fetch a bearer token from the Amadeus OAuth2 endpoint
pub async fn fetch_token(ctx: &ToolContext) -> Result<String> {
    let url = format!("{}/v1/security/oauth2/token", ctx.endpoints.amadeus_base);

    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", ctx.credentials.amadeus_client_id.as_str()),
        ("client_secret", ctx.credentials.amadeus_client_secret.as_str()),
    ];

    let response = ctx.http.post(&url).form(&params).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TriprError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let body: Value = response.json().await?;
    body.get("access_token")
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| TriprError::Tool("Amadeus token response missing access_token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::context::test_context;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=test-amadeus-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-123",
                "expires_in": 1799
            })))
            .mount(&server)
            .await;

        let ctx = test_context(&server.uri());
        let token = fetch_token(&ctx).await.unwrap();
        assert_eq!(token, "tok-123");
    }

    #[tokio::test]
    async fn test_fetch_token_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid client"))
            .mount(&server)
            .await;

        let ctx = test_context(&server.uri());
        let err = fetch_token(&ctx).await.unwrap_err();
        assert!(matches!(err, TriprError::Upstream { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_fetch_token_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 1799})))
            .mount(&server)
            .await;

        let ctx = test_context(&server.uri());
        let err = fetch_token(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }
}
