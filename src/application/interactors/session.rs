use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::{
    application::{
        app_error::AppResult,
        dto::session::{SessionTokensDTO, SessionValidationResult, ValidateSessionDTO},
        interface::{
            crypto::TokenGenerator,
            db::DBSession,
            events::{AuthEvent, AuthEventPublisher},
            gateway::session::{SessionReader, SessionWriter},
        },
    },
    domain::entities::auth_session::{AuthSession, TokenState},
};

/// Checks a presented access token for existence and expiry, rotating the
/// session when only the access half has expired and a matching refresh
/// token is presented.
#[derive(Clone)]
pub struct ValidateSessionInteractor {
    db_session: Arc<dyn DBSession>,
    session_reader: Arc<dyn SessionReader>,
    session_writer: Arc<dyn SessionWriter>,
    tokens: Arc<dyn TokenGenerator>,
    events: Arc<dyn AuthEventPublisher>,
}

impl ValidateSessionInteractor {
    pub fn new(
        db_session: Arc<dyn DBSession>,
        session_reader: Arc<dyn SessionReader>,
        session_writer: Arc<dyn SessionWriter>,
        tokens: Arc<dyn TokenGenerator>,
        events: Arc<dyn AuthEventPublisher>,
    ) -> Self {
        Self {
            db_session,
            session_reader,
            session_writer,
            tokens,
            events,
        }
    }

    pub async fn execute(&self, dto: ValidateSessionDTO) -> AppResult<SessionValidationResult> {
        let Some(session) = self.session_reader.find_by_access_token(&dto.access_token).await? else {
            return Ok(SessionValidationResult::Invalid);
        };
        let session_id = session.id;

        let now = Utc::now();
        match session.token_state(now) {
            TokenState::Active => Ok(SessionValidationResult::Valid {
                identity_id: session.identity_id,
                session_id,
                refresh_expires_at: session.refresh_expires_at,
            }),
            TokenState::Expired => {
                self.session_writer.delete(&session_id).await?;
                self.db_session.commit().await?;
                self.events.publish(AuthEvent::SessionExpired { session_id });
                info!("Session {} expired", session_id);
                Ok(SessionValidationResult::Expired)
            }
            TokenState::Refreshable => {
                if dto.refresh_token.as_deref() != Some(session.refresh_token.as_str()) {
                    return Ok(SessionValidationResult::Expired);
                }
                let new_session = AuthSession::issue(
                    session.identity_id,
                    self.tokens.generate(),
                    self.tokens.generate(),
                    now,
                    Duration::seconds(dto.ttls.access_ttl),
                    Duration::seconds(dto.ttls.refresh_ttl),
                );
                let tokens = SessionTokensDTO::from(&new_session);
                let new_session_id = self.session_writer.rotate(&session_id, new_session).await?;
                self.db_session.commit().await?;
                self.events.publish(AuthEvent::SessionRotated {
                    old_session_id: session_id,
                    new_session_id,
                    refresh_expires_at: tokens.refresh_expires_at,
                });
                info!("Session {} rotated to {}", session_id, new_session_id);
                Ok(SessionValidationResult::Rotated {
                    identity_id: session.identity_id,
                    session_id: new_session_id,
                    tokens,
                })
            }
        }
    }
}
