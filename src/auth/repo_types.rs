use uuid::Uuid;

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,                  // assigned at registration, never changes
    pub email: String,             // normalized (trimmed, lowercase)
    pub full_name: Option<String>, // display name
    pub password_hash: String,     // Argon2 PHC string, never leaves the auth module
}
