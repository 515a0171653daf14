use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use sqlx::{Pool, Postgres};

use crate::adapter::db::gateway::form::FormSubmissionGateway;
use crate::adapter::db::gateway::identity::IdentityGateway;
use crate::adapter::db::gateway::profile::ProfileGateway;
use crate::adapter::db::gateway::session::SessionGateway;
use crate::adapter::db::session::SqlxSession;
use crate::adapter::events::broadcast::BroadcastAuthEvents;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interactors::auth::{SignInInteractor, SignOutInteractor, SignUpInteractor};
use crate::application::interactors::form::SubmitFormInteractor;
use crate::application::interactors::profile::{LoadProfileInteractor, UpdateProfileInteractor};
use crate::application::interactors::session::ValidateSessionInteractor;
use crate::application::interface::crypto::{CredentialsHasher, TokenGenerator};
use crate::application::session_store::SessionStore;
use crate::infra::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub hasher: Arc<dyn CredentialsHasher>,
    pub tokens: Arc<dyn TokenGenerator>,
    pub events: Arc<BroadcastAuthEvents>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<BroadcastAuthEvents> {
    fn from_ref(state: &AppState) -> Self {
        state.events.clone()
    }
}

#[async_trait]
pub trait FromAppState: Sized {
    async fn from_app_state(state: &AppState) -> AppResult<Self>;
}

fn sign_in_interactor(state: &AppState, session: &SqlxSession) -> SignInInteractor {
    SignInInteractor::new(
        Arc::new(session.clone()),
        Arc::new(IdentityGateway::new(session.clone())),
        Arc::new(SessionGateway::new(session.clone())),
        state.hasher.clone(),
        state.tokens.clone(),
        state.events.clone(),
    )
}

// SignInInteractor
#[async_trait]
impl FromAppState for SignInInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        Ok(sign_in_interactor(state, &session))
    }
}

impl<S> FromRequestParts<S> for SignInInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        SignInInteractor::from_app_state(&app_state).await
    }
}

// SignUpInteractor
#[async_trait]
impl FromAppState for SignUpInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        let identity_gateway = IdentityGateway::new(session.clone());

        Ok(SignUpInteractor::new(
            Arc::new(session.clone()),
            Arc::new(identity_gateway.clone()),
            Arc::new(identity_gateway),
            Arc::new(ProfileGateway::new(session.clone())),
            state.hasher.clone(),
            sign_in_interactor(state, &session),
        ))
    }
}

impl<S> FromRequestParts<S> for SignUpInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        SignUpInteractor::from_app_state(&app_state).await
    }
}

// SignOutInteractor
#[async_trait]
impl FromAppState for SignOutInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        let session_gateway = SessionGateway::new(session.clone());

        Ok(SignOutInteractor::new(
            Arc::new(session),
            Arc::new(session_gateway),
            state.events.clone(),
        ))
    }
}

impl<S> FromRequestParts<S> for SignOutInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        SignOutInteractor::from_app_state(&app_state).await
    }
}

// ValidateSessionInteractor
#[async_trait]
impl FromAppState for ValidateSessionInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        let session_gateway = Arc::new(SessionGateway::new(session.clone()));

        Ok(ValidateSessionInteractor::new(
            Arc::new(session),
            session_gateway.clone(),
            session_gateway,
            state.tokens.clone(),
            state.events.clone(),
        ))
    }
}

impl<S> FromRequestParts<S> for ValidateSessionInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        ValidateSessionInteractor::from_app_state(&app_state).await
    }
}

// LoadProfileInteractor
#[async_trait]
impl FromAppState for LoadProfileInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        let profile_gateway = Arc::new(ProfileGateway::new(session.clone()));

        Ok(LoadProfileInteractor::new(
            Arc::new(session.clone()),
            profile_gateway.clone(),
            profile_gateway,
            Arc::new(IdentityGateway::new(session)),
        ))
    }
}

impl<S> FromRequestParts<S> for LoadProfileInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        LoadProfileInteractor::from_app_state(&app_state).await
    }
}

// UpdateProfileInteractor
#[async_trait]
impl FromAppState for UpdateProfileInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        let profile_gateway = Arc::new(ProfileGateway::new(session.clone()));

        Ok(UpdateProfileInteractor::new(
            Arc::new(session),
            profile_gateway.clone(),
            profile_gateway,
            state.events.clone(),
        ))
    }
}

impl<S> FromRequestParts<S> for UpdateProfileInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        UpdateProfileInteractor::from_app_state(&app_state).await
    }
}

// SubmitFormInteractor
#[async_trait]
impl FromAppState for SubmitFormInteractor {
    async fn from_app_state(state: &AppState) -> AppResult<Self> {
        let session = SqlxSession::new(state.pool.clone());
        let form_gateway = FormSubmissionGateway::new(session.clone());

        Ok(SubmitFormInteractor::new(Arc::new(session), Arc::new(form_gateway)))
    }
}

impl<S> FromRequestParts<S> for SubmitFormInteractor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        SubmitFormInteractor::from_app_state(&app_state).await
    }
}
