use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::application::app_error::{AppError, AppResult};
use crate::application::dto::auth::{SignInDTO, SignOutDTO, SignUpDTO, SignUpResultDTO};
use crate::application::dto::session::SessionTokensDTO;
use crate::application::interface::crypto::{CredentialsHasher, TokenGenerator};
use crate::application::interface::db::DBSession;
use crate::application::interface::events::{AuthEvent, AuthEventPublisher};
use crate::application::interface::gateway::identity::{IdentityReader, IdentityWriter};
use crate::application::interface::gateway::profile::ProfileWriter;
use crate::application::interface::gateway::session::SessionWriter;
use crate::domain::entities::auth_session::AuthSession;
use crate::domain::entities::id::Id;
use crate::domain::entities::identity::Identity;
use crate::domain::entities::profile::{Profile, Role};

#[derive(Clone)]
pub struct SignInInteractor {
    db_session: Arc<dyn DBSession>,
    identity_reader: Arc<dyn IdentityReader>,
    session_writer: Arc<dyn SessionWriter>,
    hasher: Arc<dyn CredentialsHasher>,
    tokens: Arc<dyn TokenGenerator>,
    events: Arc<dyn AuthEventPublisher>,
}

impl SignInInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        identity_reader: Arc<dyn IdentityReader>,
        session_writer: Arc<dyn SessionWriter>,
        hasher: Arc<dyn CredentialsHasher>,
        tokens: Arc<dyn TokenGenerator>,
        events: Arc<dyn AuthEventPublisher>,
    ) -> Self {
        Self {
            db_session,
            identity_reader,
            session_writer,
            hasher,
            tokens,
            events,
        }
    }

    pub async fn execute(&self, dto: SignInDTO) -> AppResult<SessionTokensDTO> {
        let identity = self.identity_reader.find_by_email(&dto.email).await?.ok_or_else(|| {
            warn!("Sign in attempt with unknown email: {}", dto.email);
            AppError::InvalidCredentials
        })?;
        let is_valid = self.hasher.verify_password(&dto.password, &identity.password).await?;
        if !is_valid {
            warn!("Invalid password for identity: {}", identity.id);
            return Err(AppError::InvalidCredentials);
        }
        if !identity.is_confirmed {
            return Err(AppError::EmailNotConfirmed);
        }

        let session = AuthSession::issue(
            identity.id,
            self.tokens.generate(),
            self.tokens.generate(),
            Utc::now(),
            Duration::seconds(dto.ttls.access_ttl),
            Duration::seconds(dto.ttls.refresh_ttl),
        );
        let tokens = SessionTokensDTO::from(&session);
        let session_id = self.session_writer.insert(session).await?;
        self.db_session.commit().await?;

        self.events.publish(AuthEvent::SignedIn {
            session_id,
            identity_id: identity.id,
            email: identity.email,
            refresh_expires_at: tokens.refresh_expires_at,
        });
        info!("Identity {} signed in", identity.id);
        Ok(tokens)
    }
}

#[derive(Clone)]
pub struct SignUpInteractor {
    db_session: Arc<dyn DBSession>,
    identity_reader: Arc<dyn IdentityReader>,
    identity_writer: Arc<dyn IdentityWriter>,
    profile_writer: Arc<dyn ProfileWriter>,
    hasher: Arc<dyn CredentialsHasher>,
    sign_in: SignInInteractor,
}

impl SignUpInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        identity_reader: Arc<dyn IdentityReader>,
        identity_writer: Arc<dyn IdentityWriter>,
        profile_writer: Arc<dyn ProfileWriter>,
        hasher: Arc<dyn CredentialsHasher>,
        sign_in: SignInInteractor,
    ) -> Self {
        Self {
            db_session,
            identity_reader,
            identity_writer,
            profile_writer,
            hasher,
            sign_in,
        }
    }

    pub async fn execute(&self, dto: SignUpDTO) -> AppResult<SignUpResultDTO> {
        let role: Role = dto.role.parse()?;
        if self.identity_reader.find_by_email(&dto.email).await?.is_some() {
            warn!("Sign up attempt with registered email: {}", dto.email);
            return Err(AppError::EmailAlreadyRegistered);
        }

        let hashed = self.hasher.hash_password(&dto.password).await?;
        let identity = Identity::new(dto.email.clone(), hashed, !dto.require_email_confirmation);
        let identity_id = self.identity_writer.insert(identity).await?;
        self.db_session.commit().await?;
        info!("Identity {} created", identity_id);

        // A stub row may already exist for this id; the upsert overwrites it.
        let profile = Profile::new(identity_id, dto.email.clone(), role, dto.full_name);
        self.profile_writer.upsert(profile).await?;
        self.db_session.commit().await?;

        if dto.require_email_confirmation {
            info!("Identity {} awaits email confirmation", identity_id);
            return Ok(SignUpResultDTO {
                identity_id: identity_id.to_string(),
                session: None,
            });
        }

        let tokens = self
            .sign_in
            .execute(SignInDTO {
                email: dto.email,
                password: dto.password,
                ttls: dto.ttls,
            })
            .await?;
        Ok(SignUpResultDTO {
            identity_id: identity_id.to_string(),
            session: Some(tokens),
        })
    }
}

#[derive(Clone)]
pub struct SignOutInteractor {
    db_session: Arc<dyn DBSession>,
    session_writer: Arc<dyn SessionWriter>,
    events: Arc<dyn AuthEventPublisher>,
}

impl SignOutInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        session_writer: Arc<dyn SessionWriter>,
        events: Arc<dyn AuthEventPublisher>,
    ) -> Self {
        Self {
            db_session,
            session_writer,
            events,
        }
    }

    pub async fn execute(&self, dto: SignOutDTO) -> AppResult<()> {
        let session_id: Id<AuthSession> = dto.session_id.try_into()?;
        self.session_writer.delete(&session_id).await?;
        self.db_session.commit().await?;
        self.events.publish(AuthEvent::SignedOut { session_id });
        info!("Session {} signed out", session_id);
        Ok(())
    }
}
