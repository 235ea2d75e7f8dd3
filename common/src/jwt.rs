use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;

/// The only claim the client reads from its bearer token.
#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying its signature.
///
/// The client never holds the signing secret; the expiry is only used to
/// drop a stale token before asking the backend. Returns `None` for opaque
/// (non-JWT) tokens or tokens without `exp`.
pub fn token_expiry(token: &str) -> Option<i64> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.exp)
}

/// True when the token carries an `exp` at or before `now` (unix seconds).
pub fn is_expired(token: &str, now: i64) -> bool {
    token_expiry(token).is_some_and(|exp| exp <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        user_id: u64,
        exp: i64,
    }

    fn token(exp: i64) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &Claims { user_id: 7, exp },
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn reads_expiry_without_secret() {
        assert_eq!(token_expiry(&token(1_700_000_000)), Some(1_700_000_000));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let t = token(1_000);
        assert!(is_expired(&t, 1_000));
        assert!(is_expired(&t, 1_001));
        assert!(!is_expired(&t, 999));
    }

    #[test]
    fn opaque_tokens_never_expire_locally() {
        assert_eq!(token_expiry("opaque-session-token"), None);
        assert!(!is_expired("opaque-session-token", i64::MAX));
    }
}
