use super::error::ApiError;
use super::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Proof that the request carried `Authorization: Bearer <shared secret>`.
///
/// Used as a handler argument ahead of the body, so a bad credential is
/// rejected before the body is read or the model is called.
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

impl FromRequestParts<Arc<AppState>> for BearerAuth {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AppState>,
  ) -> Result<Self, Self::Rejection> {
    let provided = parts
      .headers
      .get(AUTHORIZATION)
      .map(|v| v.as_bytes())
      .unwrap_or_default();

    if credential_matches(provided, &state.access_secret) {
      Ok(BearerAuth)
    } else {
      tracing::debug!("rejected request with missing or wrong bearer credential");
      Err(ApiError::Unauthorized)
    }
  }
}

fn credential_matches(header: &[u8], secret: &str) -> bool {
  if secret.is_empty() {
    return false;
  }
  let expected = format!("Bearer {}", secret);
  expected.as_bytes().ct_eq(header).into()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_credential_matches_exact_header() {
    assert!(credential_matches(b"Bearer s3cret", "s3cret"));
  }

  #[test]
  fn test_credential_rejects_variants() {
    assert!(!credential_matches(b"", "s3cret"));
    assert!(!credential_matches(b"s3cret", "s3cret"));
    assert!(!credential_matches(b"bearer s3cret", "s3cret"));
    assert!(!credential_matches(b"Bearer s3cret ", "s3cret"));
    assert!(!credential_matches(b"Bearer other", "s3cret"));
    assert!(!credential_matches(b"Bearer ", ""));
  }
}
