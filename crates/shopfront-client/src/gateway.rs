//! Remote gateway client.
//!
//! Thin HTTP wrapper over the storefront API: bearer-token injection
//! sourced from the token manager on every request, and uniform error
//! normalization into [`GatewayError`]. Callers never handle
//! transport-specific errors.

use async_trait::async_trait;
use shopfront_core::models::{Product, UserProfile};

use crate::error::{extract_error_message, GatewayError};
use crate::token::TokenManager;
use crate::types::{
    Ack, CodeKind, ForgotPasswordRequest, ResetPasswordRequest, SignInRequest, SignInResponse,
    SignUpRequest, ValidateCodeRequest, VerifyEmailRequest,
};

/// The remote operations the session coordinator and the validation
/// sweeps consume. Split out as a trait so tests can stub the remote
/// side without HTTP.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// `POST /auth/signin`. On success the token manager stores the
    /// returned access token as a side effect.
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<SignInResponse, GatewayError>;

    /// `GET /auth/me` with bearer auth.
    async fn get_profile(&self) -> Result<UserProfile, GatewayError>;

    /// `GET /products/{id}`. A 404 maps to `Ok(None)`: the product no
    /// longer exists upstream, which is an answer, not a failure.
    async fn get_product(&self, id: i64) -> Result<Option<Product>, GatewayError>;
}

/// Configuration for the HTTP gateway.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Base URL of the storefront API (e.g. `https://api.example.com`).
    pub base_url: String,
    /// Request timeout in seconds. A timed-out request surfaces as a
    /// `Network` error.
    pub timeout_secs: u64,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Reqwest-backed gateway for the storefront API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenManager,
}

impl HttpGateway {
    /// Create a gateway. Fails with `Config` if the base URL doesn't
    /// parse or the HTTP client can't be built.
    pub fn new(options: GatewayOptions, tokens: TokenManager) -> Result<Self, GatewayError> {
        url::Url::parse(&options.base_url)
            .map_err(|e| GatewayError::Config(format!("invalid base URL: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// The normalized base URL this gateway targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Internal helpers ───────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` if a valid token exists.
    ///
    /// The token is read through the manager on every request, not
    /// cached here, so a just-expired token is never attached.
    async fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.read().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let req = self.authorize(self.http.get(self.url(path))).await;
        let resp = req.send().await.map_err(GatewayError::network)?;
        Self::handle_response(resp).await
    }

    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let req = self.authorize(self.http.post(self.url(path))).await;
        let resp = req.json(body).send().await.map_err(GatewayError::network)?;
        Self::handle_response(resp).await
    }

    /// Map a response to a value or a normalized error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(GatewayError::network)?;
        Self::decode_body(status, body)
    }

    /// Decode a response body against an expected type.
    ///
    /// A successful status with an empty body decodes as `null`, falling
    /// back to an empty object so ack-style struct responses still parse.
    fn decode_body<T: serde::de::DeserializeOwned>(
        status: u16,
        body: String,
    ) -> Result<T, GatewayError> {
        if (200..300).contains(&status) {
            let result = if body.is_empty() {
                serde_json::from_str("null").or_else(|_| serde_json::from_str("{}"))
            } else {
                serde_json::from_str(&body)
            };
            result.map_err(|e| GatewayError::Server {
                status,
                message: format!("failed to decode response: {e}"),
                body,
            })
        } else {
            Err(GatewayError::Server {
                status,
                message: extract_error_message(&body),
                body,
            })
        }
    }

    // ─── Auth endpoints ─────────────────────────────────────────────

    /// `POST /auth/verify-email`.
    pub async fn verify_email(&self, email: &str) -> Result<Ack, GatewayError> {
        self.post(
            "/auth/verify-email",
            &VerifyEmailRequest {
                email: email.to_string(),
            },
        )
        .await
    }

    /// `POST /auth/validate-code`.
    pub async fn validate_code(
        &self,
        email: &str,
        code: &str,
        kind: CodeKind,
    ) -> Result<Ack, GatewayError> {
        self.post(
            "/auth/validate-code",
            &ValidateCodeRequest {
                email: email.to_string(),
                code: code.to_string(),
                kind,
            },
        )
        .await
    }

    /// `POST /auth/signup`.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Ack, GatewayError> {
        self.post(
            "/auth/signup",
            &SignUpRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// `POST /auth/forgot-password`.
    pub async fn forgot_password(&self, email: &str) -> Result<Ack, GatewayError> {
        self.post(
            "/auth/forgot-password",
            &ForgotPasswordRequest {
                email: email.to_string(),
            },
        )
        .await
    }

    /// `POST /auth/reset-password`.
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<Ack, GatewayError> {
        self.post(
            "/auth/reset-password",
            &ResetPasswordRequest {
                email: email.to_string(),
                new_password: new_password.to_string(),
            },
        )
        .await
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, GatewayError> {
        let resp: SignInResponse = self
            .post(
                "/auth/signin",
                &SignInRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.tokens.store(&resp.access_token).await;
        Ok(resp)
    }

    async fn get_profile(&self) -> Result<UserProfile, GatewayError> {
        self.get("/auth/me").await
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, GatewayError> {
        match self.get::<Product>(&format!("/products/{id}")).await {
            Ok(product) => Ok(Some(product)),
            Err(GatewayError::Server { status: 404, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::storage::MemoryStorage;
    use std::sync::Arc;

    fn gateway(base_url: &str) -> Result<HttpGateway, GatewayError> {
        let tokens = TokenManager::new(Arc::new(MemoryStorage::new()));
        HttpGateway::new(
            GatewayOptions {
                base_url: base_url.into(),
                ..Default::default()
            },
            tokens,
        )
    }

    #[test]
    fn test_gateway_rejects_bad_base_url() {
        let err = gateway("not a url").unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let gw = gateway("https://api.example.com/").unwrap();
        assert_eq!(gw.base_url(), "https://api.example.com");
        assert_eq!(gw.url("/auth/me"), "https://api.example.com/auth/me");
    }

    #[test]
    fn test_default_options() {
        let opts = GatewayOptions::default();
        assert_eq!(opts.timeout_secs, 30);
        assert!(opts.base_url.is_empty());
    }

    #[test]
    fn test_decode_empty_success_body_as_ack() {
        let ack: Ack = HttpGateway::decode_body(200, String::new()).unwrap();
        assert!(ack.message.is_none());
    }

    #[test]
    fn test_decode_empty_success_body_as_option() {
        let value: Option<Ack> = HttpGateway::decode_body(204, String::new()).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_success_body() {
        let resp: crate::types::SignInResponse =
            HttpGateway::decode_body(200, r#"{"access_token":"tok"}"#.to_string()).unwrap();
        assert_eq!(resp.access_token, "tok");
    }

    #[test]
    fn test_decode_garbage_success_body_is_server_error() {
        let err = HttpGateway::decode_body::<Ack>(200, "not json".to_string()).unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert!(err.message().starts_with("failed to decode response"));
    }

    #[test]
    fn test_decode_error_status_extracts_message() {
        let err = HttpGateway::decode_body::<Ack>(
            401,
            r#"{"message":"Invalid credentials"}"#.to_string(),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), "Invalid credentials");
    }
}
