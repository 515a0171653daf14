use std::sync::Arc;

use tracing::{info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::id::IdDTO;
use crate::application::dto::profile::{ProfileDTO, ProfileLoad, UpdateProfileDTO};
use crate::application::interface::db::DBSession;
use crate::application::interface::events::{AuthEvent, AuthEventPublisher};
use crate::application::interface::gateway::identity::IdentityReader;
use crate::application::interface::gateway::profile::{ProfileReader, ProfileWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::identity::Identity;
use crate::domain::entities::profile::{Profile, ProfilePatch, Role};

#[derive(Clone)]
pub struct LoadProfileInteractor {
    db_session: Arc<dyn DBSession>,
    profile_reader: Arc<dyn ProfileReader>,
    profile_writer: Arc<dyn ProfileWriter>,
    identity_reader: Arc<dyn IdentityReader>,
}

impl LoadProfileInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        profile_reader: Arc<dyn ProfileReader>,
        profile_writer: Arc<dyn ProfileWriter>,
        identity_reader: Arc<dyn IdentityReader>,
    ) -> Self {
        Self {
            db_session,
            profile_reader,
            profile_writer,
            identity_reader,
        }
    }

    pub async fn execute(&self, dto: IdDTO) -> AppResult<ProfileLoad> {
        let identity_id: Id<Identity> = dto.id.try_into()?;
        let profile_id: Id<Profile> = identity_id.cast();
        if let Some(profile) = self.profile_reader.find_by_id(&profile_id).await? {
            return Ok(ProfileLoad::Found(profile.into()));
        }

        let Some(identity) = self.identity_reader.find_by_id(&identity_id).await? else {
            warn!("Identity {} has neither a profile nor a credential record", identity_id);
            return Ok(ProfileLoad::NotFound);
        };
        let created = self
            .profile_writer
            .insert_if_absent(Profile::default_for(identity.id, identity.email))
            .await?;
        self.db_session.commit().await?;

        // Re-read so that concurrent creators all observe the surviving row.
        let profile = self
            .profile_reader
            .find_by_id(&profile_id)
            .await?
            .ok_or(AppError::ProfileNotFound)?;
        if created {
            info!("Created default profile for identity {}", identity_id);
            return Ok(ProfileLoad::Created(profile.into()));
        }
        Ok(ProfileLoad::Found(profile.into()))
    }
}

#[derive(Clone)]
pub struct UpdateProfileInteractor {
    db_session: Arc<dyn DBSession>,
    profile_reader: Arc<dyn ProfileReader>,
    profile_writer: Arc<dyn ProfileWriter>,
    events: Arc<dyn AuthEventPublisher>,
}

impl UpdateProfileInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        profile_reader: Arc<dyn ProfileReader>,
        profile_writer: Arc<dyn ProfileWriter>,
        events: Arc<dyn AuthEventPublisher>,
    ) -> Self {
        Self {
            db_session,
            profile_reader,
            profile_writer,
            events,
        }
    }

    pub async fn execute(&self, dto: UpdateProfileDTO) -> AppResult<ProfileDTO> {
        let identity_id = dto.identity_id.ok_or_else(|| {
            warn!("Profile update without an active identity");
            AppError::NotAuthenticated
        })?;
        let identity_id: Id<Identity> = identity_id.try_into()?;
        let role = dto.role.map(|role| role.parse::<Role>()).transpose()?;
        let patch = ProfilePatch {
            full_name: dto.full_name,
            role,
            company: dto.company,
            bio: dto.bio,
        };

        let profile_id: Id<Profile> = identity_id.cast();
        let mut profile = self
            .profile_reader
            .find_by_id(&profile_id)
            .await?
            .ok_or(AppError::ProfileNotFound)?;
        if !patch.is_empty() {
            profile.apply(patch);
            self.profile_writer.update(profile).await?;
            self.db_session.commit().await?;
            info!("Profile {} updated", profile_id);
        }

        let profile: ProfileDTO = self
            .profile_reader
            .find_by_id(&profile_id)
            .await?
            .ok_or(AppError::ProfileNotFound)?
            .into();
        self.events.publish(AuthEvent::ProfileUpdated {
            identity_id,
            profile: profile.clone(),
        });
        Ok(profile)
    }
}
