use crate::common::SessionError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Holder of the bearer token used for backend calls.
///
/// Owned by the application root and passed explicitly to whatever needs it.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: String);
    fn clear(&self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub sub: Option<String>,
}

/// A JWT whose payload has been decoded. The signature is not checked; the
/// backend does that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub raw: String,
    pub claims: TokenClaims,
}

impl AccessToken {
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let mut parts = raw.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_header), Some(payload), Some(_sig), None) if !payload.is_empty() => payload,
            _ => return Err(SessionError::MalformedToken("expected three dot-separated segments".into())),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| SessionError::MalformedToken(format!("payload is not base64url: {}", e)))?;
        let claims: TokenClaims = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::MalformedToken(format!("payload is not a claims object: {}", e)))?;

        Ok(Self {
            raw: raw.to_string(),
            claims,
        })
    }

    /// True once `exp + skew_secs` lies in the past. Tokens without `exp` never expire.
    pub fn is_expired(&self, now_secs: u64, skew_secs: u64) -> bool {
        match self.claims.exp {
            Some(exp) => exp.saturating_add(skew_secs) < now_secs,
            None => false,
        }
    }
}

/// Current Unix time in seconds, 0 if the clock is before the epoch.
pub fn current_time_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(claims: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn parses_exp_and_sub() {
        let token = AccessToken::parse(&jwt(r#"{"exp":1700000000,"sub":"agent-7"}"#)).unwrap();
        assert_eq!(token.claims.exp, Some(1_700_000_000));
        assert_eq!(token.claims.sub.as_deref(), Some("agent-7"));
    }

    #[test]
    fn expiry_respects_skew() {
        let token = AccessToken::parse(&jwt(r#"{"exp":1000}"#)).unwrap();
        assert!(!token.is_expired(1000, 0));
        assert!(token.is_expired(1001, 0));
        assert!(!token.is_expired(1030, 30));
        assert!(token.is_expired(1031, 30));
    }

    #[test]
    fn missing_exp_never_expires() {
        let token = AccessToken::parse(&jwt(r#"{"sub":"x"}"#)).unwrap();
        assert!(!token.is_expired(u64::MAX, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(AccessToken::parse("not-a-jwt").is_err());
        assert!(AccessToken::parse("a.!!!.c").is_err());
        assert!(AccessToken::parse(&format!("a.{}.c", URL_SAFE_NO_PAD.encode("\"plain\""))).is_err());
    }

    #[test]
    fn rejects_extra_segments() {
        let token = jwt(r#"{"exp":1000}"#);
        assert!(AccessToken::parse(&format!("{}.extra", token)).is_err());
        assert!(AccessToken::parse(&format!("{}.iv.tag", token)).is_err());
    }
}
