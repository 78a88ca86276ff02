//! Request and response types for the remote gateway.
//!
//! These mirror the storefront API's JSON shapes. Field names are
//! camelCase on the wire; the one snake_case exception (`access_token`)
//! follows the server's sign-in response as-is.

use serde::{Deserialize, Serialize};

// ─── Email verification ─────────────────────────────────────────────

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
}

/// What a verification code is for. Sent as `type` when validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeKind {
    VerifyEmail,
    ForgotPassword,
}

/// Request body for `POST /auth/validate-code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCodeRequest {
    pub email: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: CodeKind,
}

// ─── Sign-up / sign-in ──────────────────────────────────────────────

/// Request body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Response from `POST /auth/signin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub access_token: String,
}

// ─── Password recovery ──────────────────────────────────────────────

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

// ─── Generic ────────────────────────────────────────────────────────

/// Opaque acknowledgement returned by several auth endpoints. The body
/// may carry a message; callers only depend on the 2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
