use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::repo_types::User;

/// Lowercases and trims an email so lookups and uniqueness are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Storage capability the auth service needs. Implementations normalize
/// emails themselves so callers can pass raw input.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Insert the user unless its normalized email is taken. The check and the
    /// insert happen as one step; returns `false` when the email already exists.
    async fn insert_if_absent(&self, user: User) -> anyhow::Result<bool>;
}

/// Volatile store keyed by normalized email.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let key = normalize_email(email);
        Ok(self.users.read().await.get(&key).cloned())
    }

    async fn insert_if_absent(&self, mut user: User) -> anyhow::Result<bool> {
        user.email = normalize_email(&user.email);
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            debug!(email = %user.email, "insert skipped, email taken");
            return Ok(false);
        }
        users.insert(user.email.clone(), user);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            full_name: None,
            password_hash: "hash".into(),
        }
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive() {
        let store = InMemoryUserStore::new();
        assert!(store.insert_if_absent(user("User@Example.com")).await.unwrap());

        let found = store
            .find_by_email("user@example.com")
            .await
            .unwrap()
            .expect("user should be found");
        assert_eq!(found.email, "user@example.com");
        assert!(store.find_by_email("USER@EXAMPLE.COM").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn second_insert_with_same_email_is_rejected() {
        let store = InMemoryUserStore::new();
        let first = user("a@x.com");
        let first_id = first.id;
        assert!(store.insert_if_absent(first).await.unwrap());
        assert!(!store.insert_if_absent(user("A@X.com")).await.unwrap());

        assert_eq!(store.len().await, 1);
        let kept = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(kept.id, first_id);
    }

    #[tokio::test]
    async fn concurrent_inserts_admit_exactly_one() {
        let store = Arc::new(InMemoryUserStore::new());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let email = if i % 2 == 0 { "race@x.com" } else { "RACE@x.com" };
            tasks.push(tokio::spawn(async move {
                store.insert_if_absent(user(email)).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for task in tasks {
            if task.await.unwrap() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_email_returns_none() {
        let store = InMemoryUserStore::new();
        assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
    }
}
