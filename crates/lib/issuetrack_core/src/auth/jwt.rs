//! JWT token generation and verification.
//!
//! Both directions take the current instant as an argument. Expiry is
//! checked here rather than by `jsonwebtoken` so callers can verify against
//! a simulated clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::auth::{AccessToken, TokenClaims};

/// Signing algorithm for every token this crate issues or accepts.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Generate a signed JWT access token (HS256) expiring at `now + ttl`.
pub fn generate_access_token(
    subject: &str,
    ttl: Duration,
    now: DateTime<Utc>,
    secret: &[u8],
) -> Result<AccessToken, AuthError> {
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Internal(format!("token lifetime {ttl} is out of range")))?;
    let claims = TokenClaims {
        sub: subject.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };
    let token = encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))?;

    Ok(AccessToken {
        token,
        subject: claims.sub,
        expires_at,
    })
}

/// Verify a JWT access token, returning the claims on success.
///
/// A token is expired once `now` has reached its `exp` instant.
pub fn verify_access_token(
    token: &str,
    now: DateTime<Utc>,
    secret: &[u8],
) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => AuthError::TokenError("invalid signature".into()),
            ErrorKind::InvalidAlgorithm => AuthError::TokenError("unexpected algorithm".into()),
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::TokenError(format!("missing claim: {claim}"))
            }
            _ => AuthError::TokenError(format!("malformed token: {e}")),
        })?;

    if claims.sub.trim().is_empty() {
        return Err(AuthError::TokenError("missing claim: sub".into()));
    }
    if claims.exp <= now.timestamp() {
        return Err(AuthError::TokenExpired);
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn roundtrip_carries_subject_and_expiry() {
        let now = Utc::now();
        let token = generate_access_token("johndoe", Duration::minutes(30), now, SECRET).unwrap();
        let claims = verify_access_token(&token.token, now, SECRET).unwrap();
        assert_eq!(claims.sub, "johndoe");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, (now + Duration::minutes(30)).timestamp());
        assert_eq!(token.expires_at, now + Duration::minutes(30));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now();
        let token = generate_access_token("johndoe", Duration::minutes(30), issued, SECRET).unwrap();
        let later = issued + Duration::minutes(31);
        assert!(matches!(
            verify_access_token(&token.token, later, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn expiry_past_the_calendar_is_an_error() {
        // 300,000 years puts exp beyond the last representable date.
        let ttl = Duration::days(365 * 300_000);
        let err = generate_access_token("johndoe", ttl, Utc::now(), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = Utc::now();
        let token = generate_access_token("johndoe", Duration::minutes(5), now, SECRET).unwrap();
        let err = verify_access_token(&token.token, now, b"other-secret").unwrap_err();
        assert!(matches!(err, AuthError::TokenError(ref m) if m.contains("signature")));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let now = Utc::now();
        let token = generate_access_token("johndoe", Duration::minutes(5), now, SECRET).unwrap();
        let forged = generate_access_token("admin", Duration::minutes(5), now, b"attacker").unwrap();

        // header.payload from the forgery, signature from the genuine token
        let genuine: Vec<&str> = token.token.split('.').collect();
        let fake: Vec<&str> = forged.token.split('.').collect();
        let spliced = format!("{}.{}.{}", fake[0], fake[1], genuine[2]);
        assert!(verify_access_token(&spliced, now, SECRET).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        let err = verify_access_token("not.a.jwt", Utc::now(), SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenError(_)));
        assert!(verify_access_token("", Utc::now(), SECRET).is_err());
    }

    #[test]
    fn missing_subject_is_rejected() {
        #[derive(serde::Serialize)]
        struct NoSubject {
            exp: i64,
        }
        let now = Utc::now();
        let token = encode(
            &Header::new(ALGORITHM),
            &NoSubject {
                exp: (now + Duration::minutes(5)).timestamp(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        let err = verify_access_token(&token, now, SECRET).unwrap_err();
        assert!(matches!(err, AuthError::TokenError(ref m) if m.contains("sub")));
    }

    #[test]
    fn empty_subject_is_rejected() {
        let now = Utc::now();
        let token = generate_access_token("", Duration::minutes(5), now, SECRET).unwrap();
        assert!(matches!(
            verify_access_token(&token.token, now, SECRET),
            Err(AuthError::TokenError(_))
        ));
    }
}
