use chrono::{DateTime, Utc};

use crate::domain::entities::id::Id;

/// Credential record of the auth backend. Profiles hang off it by id.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Id<Identity>,
    pub email: String,
    pub password: String,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(email: String, password: String, is_confirmed: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Id::generate(),
            email,
            password,
            is_confirmed,
            created_at: now,
            updated_at: now,
        }
    }
}
