//! Ticket codec
//!
//! A ticket binds a user to an event until an absolute expiry. It is an
//! HS256 JWT with the claims `{uid, eid, iat, exp}`, so any node holding the
//! secret can verify it without touching the database. Whether the seat still
//! exists is a separate question answered by the persisted ticket row.

use chrono::{DateTime, Duration, TimeZone, Utc};
use event_core::{EventId, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Any reason a ticket is rejected. Deliberately carries no detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    #[error("invalid ticket")]
    Invalid,
}

/// Verified ticket contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketClaims {
    pub user_id: UserId,
    pub event_id: EventId,
    pub expires_at: DateTime<Utc>,
}

/// Freshly signed ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTicket {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    uid: i64,
    eid: i64,
    iat: i64,
    exp: i64,
}

/// Signs and verifies reservation tickets
#[derive(Clone)]
pub struct TicketCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TicketCodec {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a ticket valid for `ttl_hours` from now
    ///
    /// # Errors
    /// Returns `TicketError::Invalid` if the lifetime is not positive or
    /// signing fails
    pub fn generate(
        &self,
        user_id: UserId,
        event_id: EventId,
        ttl_hours: i64,
    ) -> Result<IssuedTicket, TicketError> {
        self.generate_at(user_id, event_id, Utc::now(), Duration::hours(ttl_hours))
    }

    /// Sign a ticket issued at `now` that lives for `ttl`
    ///
    /// # Errors
    /// Returns `TicketError::Invalid` if `ttl` is not positive or signing fails
    pub fn generate_at(
        &self,
        user_id: UserId,
        event_id: EventId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<IssuedTicket, TicketError> {
        if ttl <= Duration::zero() {
            return Err(TicketError::Invalid);
        }
        let expires_at = now + ttl;
        let claims = WireClaims {
            uid: user_id.into_inner(),
            eid: event_id.into_inner(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(error = %e, "failed to sign ticket");
                TicketError::Invalid
            })?;

        Ok(IssuedTicket {
            token,
            // second precision, matching what validation reports back
            expires_at: from_timestamp(claims.exp)?,
        })
    }

    /// Verify signature and expiry and return the bound identifiers
    ///
    /// # Errors
    /// Returns `TicketError::Invalid` for tampered, expired or malformed tokens
    pub fn validate(&self, token: &str) -> Result<TicketClaims, TicketError> {
        let claims = decode::<WireClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "ticket rejected");
                TicketError::Invalid
            })?
            .claims;

        if claims.uid <= 0 || claims.eid <= 0 {
            return Err(TicketError::Invalid);
        }

        Ok(TicketClaims {
            user_id: UserId::new(claims.uid),
            event_id: EventId::new(claims.eid),
            expires_at: from_timestamp(claims.exp)?,
        })
    }
}

fn from_timestamp(secs: i64) -> Result<DateTime<Utc>, TicketError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or(TicketError::Invalid)
}

impl std::fmt::Debug for TicketCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn codec() -> TicketCodec {
        TicketCodec::new("ticket-test-secret")
    }

    #[test]
    fn test_round_trip() {
        let codec = codec();
        let issued = codec.generate(UserId::new(5), EventId::new(9), 24).unwrap();

        let claims = codec.validate(&issued.token).unwrap();
        assert_eq!(claims.user_id, UserId::new(5));
        assert_eq!(claims.event_id, EventId::new(9));
        assert_eq!(claims.expires_at, issued.expires_at);

        let lifetime = issued.expires_at - Utc::now();
        assert!(lifetime > Duration::hours(23) && lifetime <= Duration::hours(24));
    }

    #[test]
    fn test_token_is_url_safe() {
        let issued = codec().generate(UserId::new(1), EventId::new(2), 1).unwrap();
        assert!(issued
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }

    #[test]
    fn test_expired_ticket_rejected() {
        let codec = codec();
        let issued = codec
            .generate_at(
                UserId::new(1),
                EventId::new(2),
                Utc::now() - Duration::hours(3),
                Duration::hours(1),
            )
            .unwrap();

        assert_eq!(codec.validate(&issued.token), Err(TicketError::Invalid));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let issued = codec.generate(UserId::new(1), EventId::new(2), 1).unwrap();

        let parts: Vec<&str> = issued.token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let forged = String::from_utf8(payload)
            .unwrap()
            .replace("\"eid\":2", "\"eid\":3");
        let token = format!("{}.{}.{}", parts[0], URL_SAFE_NO_PAD.encode(forged), parts[2]);

        assert_eq!(codec.validate(&token), Err(TicketError::Invalid));
    }

    #[test]
    fn test_wrong_secret_and_garbage_rejected() {
        let issued = codec().generate(UserId::new(1), EventId::new(2), 1).unwrap();
        let other = TicketCodec::new("someone-else");

        assert_eq!(other.validate(&issued.token), Err(TicketError::Invalid));
        assert_eq!(codec().validate(""), Err(TicketError::Invalid));
        assert_eq!(codec().validate("a.b.c"), Err(TicketError::Invalid));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        assert_eq!(
            codec().generate(UserId::new(1), EventId::new(2), 0),
            Err(TicketError::Invalid)
        );
    }

    #[test]
    fn test_error_message_is_opaque() {
        assert_eq!(TicketError::Invalid.to_string(), "invalid ticket");
    }
}
