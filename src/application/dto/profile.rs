use chrono::{DateTime, Utc};

use crate::domain::entities::profile::Profile;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDTO {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileDTO {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role.to_string(),
            company: profile.company,
            bio: profile.bio,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Outcome of loading the profile of an identity.
#[derive(Debug, Clone)]
pub enum ProfileLoad {
    Found(ProfileDTO),
    /// The row was missing and a default one was created.
    Created(ProfileDTO),
    /// Neither profile nor identity exist, so nothing could be created.
    NotFound,
}

impl ProfileLoad {
    pub fn into_profile(self) -> Option<ProfileDTO> {
        match self {
            ProfileLoad::Found(profile) | ProfileLoad::Created(profile) => Some(profile),
            ProfileLoad::NotFound => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct UpdateProfileDTO {
    pub identity_id: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
}
