use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    auth::{claims::Claims, error::AuthError},
    config::JwtConfig,
};

/// Signs and verifies access tokens with the configured shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
    access_ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::from_secs(
                u64::try_from(config.ttl_minutes)
                    .unwrap_or(0)
                    .saturating_mul(60),
            ),
        }
    }

    /// Issues a token for `email` valid for the configured TTL.
    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(email, self.access_ttl)
    }

    pub fn issue_with_ttl(&self, email: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(TimeDuration::seconds(secs)))
            .ok_or_else(|| {
                AuthError::Internal(anyhow::anyhow!("token ttl {ttl:?} is out of range"))
            })?;
        let claims = Claims {
            sub: email.to_string(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.into()))?;
        debug!(email = %email, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Returns the subject email of a token that is correctly signed, names
    /// our issuer and audience, and has not reached its expiry.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.decode_claims(token)?;
        if OffsetDateTime::now_utc().unix_timestamp() >= claims.exp {
            debug!(email = %claims.sub, exp = claims.exp, "jwt expired");
            return Err(AuthError::TokenExpired);
        }
        debug!(email = %claims.sub, iat = claims.iat, "jwt verified");
        Ok(claims.sub)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked by `verify` without leeway.
        validation.validate_exp = false;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(error = %e, "jwt rejected");
                AuthError::TokenInvalid
            })
    }
}
