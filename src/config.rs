use std::{fmt, str::FromStr};

use anyhow::Context;
use jsonwebtoken::Algorithm;

pub const PROJECT_NAME: &str = "Vidyamitra API";
pub const DEV_FRONTEND_ORIGIN: &str = "http://localhost:5173";
/// Longest accepted access-token lifetime (one year).
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

// Keeps the signing secret out of logs.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub frontend_origin: String,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let algorithm = std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET_KEY")
                .context("JWT_SECRET_KEY must be set")?,
            algorithm: parse_hmac_algorithm(&algorithm)?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "vidyamitra".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "vidyamitra-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 4 * 60)?,
        };
        anyhow::ensure!(!jwt.secret.is_empty(), "JWT_SECRET_KEY must not be empty");
        check_ttl_minutes(jwt.ttl_minutes)?;

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: env_or("PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_or("PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: env_or("PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 8000)?,
            frontend_origin: std::env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| DEV_FRONTEND_ORIGIN.into()),
            jwt,
            password,
        })
    }
}

/// Only shared-secret algorithms make sense with a single `JWT_SECRET_KEY`.
pub fn parse_hmac_algorithm(name: &str) -> anyhow::Result<Algorithm> {
    let algorithm = Algorithm::from_str(name.trim())
        .with_context(|| format!("unknown JWT_ALGORITHM '{name}'"))?;
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => anyhow::bail!("JWT_ALGORITHM {other:?} needs a key pair; use HS256, HS384 or HS512"),
    }
}

fn check_ttl_minutes(minutes: i64) -> anyhow::Result<()> {
    anyhow::ensure!(minutes >= 0, "JWT_TTL_MINUTES must not be negative");
    anyhow::ensure!(
        minutes <= MAX_TTL_MINUTES,
        "JWT_TTL_MINUTES must be at most {MAX_TTL_MINUTES}"
    );
    Ok(())
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
