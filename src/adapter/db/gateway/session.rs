use async_trait::async_trait;
use futures::FutureExt;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::session::{SessionReader, SessionWriter};
use crate::domain::entities::auth_session::AuthSession;
use crate::domain::entities::id::Id;

pub struct SessionGateway {
    session: SqlxSession,
}

impl SessionGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    async fn insert_session(tx: &mut Transaction<'_, Postgres>, session: AuthSession) -> AppResult<Id<AuthSession>> {
        let result = sqlx::query(
            r#"
                INSERT INTO auth_sessions
                    (id, access_token, refresh_token, identity_id, created_at, expires_at, refresh_expires_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
            "#,
        )
        .bind(session.id.value)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.identity_id.value)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.refresh_expires_at)
        .fetch_one(tx.as_mut())
        .await?;

        let id: Uuid = result.try_get("id")?;
        Ok(Id::new(id))
    }

    async fn delete_session(tx: &mut Transaction<'_, Postgres>, session_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(tx.as_mut())
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionWriter for SessionGateway {
    async fn insert(&self, session: AuthSession) -> AppResult<Id<AuthSession>> {
        self.session
            .with_tx(|tx| async move { Self::insert_session(tx, session).await }.boxed())
            .await
    }

    async fn rotate(&self, old_session_id: &Id<AuthSession>, new_session: AuthSession) -> AppResult<Id<AuthSession>> {
        self.session
            .with_tx(|tx| {
                let old_session_id = old_session_id.value;
                async move {
                    Self::delete_session(tx, old_session_id).await?;
                    Self::insert_session(tx, new_session).await
                }
                .boxed()
            })
            .await
    }

    async fn delete(&self, session_id: &Id<AuthSession>) -> AppResult<()> {
        self.session
            .with_tx(|tx| {
                let session_id = session_id.value;
                async move { Self::delete_session(tx, session_id).await }.boxed()
            })
            .await
    }
}

#[async_trait]
impl SessionReader for SessionGateway {
    async fn find_by_access_token(&self, access_token: &str) -> AppResult<Option<AuthSession>> {
        self.session
            .with_tx(|tx| {
                let access_token = access_token.to_owned();
                async move {
                    let result = sqlx::query(
                        r#"
                            SELECT
                                id, access_token, refresh_token, identity_id,
                                created_at, expires_at, refresh_expires_at
                            FROM auth_sessions
                            WHERE access_token = $1
                        "#,
                    )
                    .bind(&access_token)
                    .fetch_optional(tx.as_mut())
                    .await?;

                    match result {
                        Some(row) => Ok(Some(AuthSession {
                            id: Id::new(row.try_get("id")?),
                            access_token: row.try_get("access_token")?,
                            refresh_token: row.try_get("refresh_token")?,
                            identity_id: Id::new(row.try_get("identity_id")?),
                            created_at: row.try_get("created_at")?,
                            expires_at: row.try_get("expires_at")?,
                            refresh_expires_at: row.try_get("refresh_expires_at")?,
                        })),
                        None => Ok(None),
                    }
                }
                .boxed()
            })
            .await
    }
}
