use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{
    jwt::JwtKeys, password::PasswordService, repo::InMemoryUserStore, services::AuthService,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        // Volatile until a database-backed UserStore exists.
        let store = Arc::new(InMemoryUserStore::new());
        let passwords = PasswordService::new(config.password)?;
        let keys = JwtKeys::new(&config.jwt);

        Ok(Self {
            auth: AuthService::new(store, passwords, keys),
            config,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, PasswordConfig};

        let config = AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            frontend_origin: "http://localhost:5173".into(),
            jwt: JwtConfig {
                secret: "test".into(),
                algorithm: jsonwebtoken::Algorithm::HS256,
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            password: PasswordConfig {
                memory_kib: 8,
                iterations: 1,
                parallelism: 1,
            },
        };
        Self::init(config).expect("fake state")
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
