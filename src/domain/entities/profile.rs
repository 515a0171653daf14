use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::application::app_error::AppError;
use crate::domain::entities::{id::Id, identity::Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Founder,
    Expert,
    Investor,
    #[default]
    Interested,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Founder => "founder",
            Role::Expert => "expert",
            Role::Investor => "investor",
            Role::Interested => "interested",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "founder" => Ok(Role::Founder),
            "expert" => Ok(Role::Expert),
            "investor" => Ok(Role::Investor),
            "interested" => Ok(Role::Interested),
            other => Err(AppError::InvalidRole(other.to_string())),
        }
    }
}

/// Application-owned record for an identity. Shares its primary key with the
/// identity, so there is at most one per identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Id<Profile>,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub company: Option<String>,
    pub bio: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.role.is_none() && self.company.is_none() && self.bio.is_none()
    }
}

impl Profile {
    pub fn new(identity_id: Id<Identity>, email: String, role: Role, full_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: identity_id.cast(),
            email,
            full_name,
            role,
            company: None,
            bio: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Profile created on the fly for an identity that has none.
    pub fn default_for(identity_id: Id<Identity>, email: String) -> Self {
        Self::new(identity_id, email, Role::default(), None)
    }

    pub fn apply(&mut self, patch: ProfilePatch) {
        if patch.is_empty() {
            return;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = Some(full_name);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(company) = patch.company {
            self.company = Some(company);
        }
        if let Some(bio) = patch.bio {
            self.bio = Some(bio);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use crate::domain::entities::id::Id;
    use crate::domain::entities::profile::{Profile, ProfilePatch, Role};

    #[fixture]
    fn profile() -> Profile {
        let mut profile = Profile::new(
            Id::generate(),
            "ada@example.org".to_string(),
            Role::Founder,
            Some("Ada".to_string()),
        );
        profile.company = Some("Analytical Engines".to_string());
        profile
    }

    #[rstest]
    #[case("founder", Role::Founder)]
    #[case("expert", Role::Expert)]
    #[case("investor", Role::Investor)]
    #[case("interested", Role::Interested)]
    fn test_role_parse(#[case] raw: &str, #[case] role: Role) {
        assert_eq!(raw.parse::<Role>().unwrap(), role);
        assert_eq!(role.to_string(), raw);
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!("admin".parse::<Role>().is_err());
        assert!("Founder".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_profile_is_interested() {
        let identity_id = Id::generate();
        let profile = Profile::default_for(identity_id, "x@example.org".to_string());
        assert_eq!(profile.role, Role::Interested);
        assert_eq!(profile.id.value, identity_id.value);
        assert!(profile.full_name.is_none());
    }

    #[rstest]
    fn test_apply_only_touches_supplied_fields(mut profile: Profile) {
        let before = profile.clone();
        profile.apply(ProfilePatch {
            bio: Some("Poet of numbers".to_string()),
            ..ProfilePatch::default()
        });

        assert_eq!(profile.bio.as_deref(), Some("Poet of numbers"));
        assert_eq!(profile.full_name, before.full_name);
        assert_eq!(profile.company, before.company);
        assert_eq!(profile.role, before.role);
        assert_eq!(profile.email, before.email);
        assert!(profile.updated_at >= before.updated_at);
    }

    #[rstest]
    fn test_apply_empty_patch_is_noop(mut profile: Profile) {
        let before = profile.clone();
        profile.apply(ProfilePatch::default());
        assert_eq!(profile, before);
    }
}
