use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{FromRequest, Request},
    http::header::HeaderMap,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Webhook secret for HMAC verification
#[derive(Clone)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Verified webhook payload extractor
///
/// Validates the HMAC-SHA256 signature from the `X-Hub-Signature-256`
/// header against the request body before the handler ever sees it.
#[derive(Debug)]
pub struct VerifiedWebhookPayload(pub Vec<u8>);

impl FromRequest<AppState> for VerifiedWebhookPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();

        let signature = extract_signature(&parts.headers)?;

        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read request body: {}", e)))?
            .to_vec();

        verify_signature(&body_bytes, &signature, state.webhook_secret.expose())?;

        Ok(VerifiedWebhookPayload(body_bytes))
    }
}

/// Extract signature from X-Hub-Signature-256 header
fn extract_signature(headers: &HeaderMap) -> Result<Vec<u8>, ApiError> {
    let signature_header = headers
        .get("X-Hub-Signature-256")
        .ok_or_else(|| {
            ApiError::InvalidSignature("X-Hub-Signature-256 header not found".to_string())
        })?
        .to_str()
        .map_err(|e| ApiError::InvalidSignature(format!("Invalid header encoding: {}", e)))?;

    // GitHub sends signature as "sha256=<hex>"
    let signature_hex = signature_header.strip_prefix("sha256=").ok_or_else(|| {
        ApiError::InvalidSignature("Signature must start with 'sha256='".to_string())
    })?;

    hex::decode(signature_hex)
        .map_err(|e| ApiError::InvalidSignature(format!("Invalid hex encoding: {}", e)))
}

/// Verify HMAC-SHA256 signature using constant-time comparison
fn verify_signature(body: &[u8], signature: &[u8], secret: &str) -> Result<(), ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ApiError::Internal(format!("HMAC initialization failed: {}", e)))?;

    mac.update(body);
    let expected = mac.finalize().into_bytes();

    // Constant-time comparison to prevent timing attacks
    if expected.ct_eq(signature).into() {
        Ok(())
    } else {
        Err(ApiError::InvalidSignature("Signature mismatch".to_string()))
    }
}
