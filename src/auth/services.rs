use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    jwt::JwtKeys,
    password::PasswordService,
    repo::{normalize_email, UserStore},
    repo_types::User,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex");
    }
    EMAIL_RE.is_match(email)
}

/// Registration, login and token-to-user resolution over an injected store.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    passwords: PasswordService,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, passwords: PasswordService, keys: JwtKeys) -> Self {
        Self {
            store,
            passwords,
            keys,
        }
    }

    #[cfg(test)]
    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    /// Creates a user unless the normalized email is already taken.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<User, AuthError> {
        let email = normalize_email(email);

        // Skip the expensive hash for an obvious duplicate; the atomic insert
        // below still decides races.
        if self.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = self.hash_password(password).await?;
        let user = User {
            id: Uuid::new_v4(),
            email,
            full_name,
            password_hash,
        };

        if !self.store.insert_if_absent(user.clone()).await? {
            warn!(email = %user.email, "email registered concurrently");
            return Err(AuthError::DuplicateIdentity);
        }

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_by_email(email).await?)
    }

    /// Checks credentials and returns the matching user. Unknown email and
    /// wrong password both yield `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);
        let user = self.store.find_by_email(&email).await?;

        let hash = user.as_ref().map(|u| u.password_hash.clone());
        let ok = self.verify_password(password, hash).await?;

        match user {
            Some(user) if ok => Ok(user),
            Some(user) => {
                warn!(email = %email, user_id = %user.id, "login invalid password");
                Err(AuthError::InvalidCredentials)
            }
            None => {
                warn!(email = %email, "login unknown email");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Authenticates and issues an access token for the user.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self.authenticate(email, password).await?;
        let token = self.keys.issue(&user.email)?;
        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(token)
    }

    /// Verifies the token and loads its subject.
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let email = self.keys.verify(token)?;
        match self.store.find_by_email(&email).await? {
            Some(user) => {
                debug!(user_id = %user.id, "identity resolved");
                Ok(user)
            }
            None => {
                warn!(email = %email, "token subject not found");
                Err(AuthError::IdentityNotFound)
            }
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let passwords = self.passwords.clone();
        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.into()))??;
        Ok(hash)
    }

    // Without a stored hash, burns a dummy verification instead.
    async fn verify_password(
        &self,
        password: &str,
        hash: Option<String>,
    ) -> Result<bool, AuthError> {
        let passwords = self.passwords.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => passwords.verify(&password, &hash),
            None => passwords.verify_dummy(&password),
        })
        .await
        .map_err(|e| AuthError::Internal(e.into()))
    }
}
