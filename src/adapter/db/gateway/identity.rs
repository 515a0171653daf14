use async_trait::async_trait;
use futures::FutureExt;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::gateway::identity::{IdentityReader, IdentityWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::identity::Identity;

#[derive(Clone)]
pub struct IdentityGateway {
    session: SqlxSession,
}

impl IdentityGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    fn map_identity(result: Option<PgRow>) -> AppResult<Option<Identity>> {
        match result {
            Some(row) => Ok(Some(Identity {
                id: Id::new(row.try_get("id")?),
                email: row.try_get("email")?,
                password: row.try_get("password")?,
                is_confirmed: row.try_get("is_confirmed")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            })),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl IdentityWriter for IdentityGateway {
    async fn insert(&self, identity: Identity) -> AppResult<Id<Identity>> {
        self.session
            .with_tx(|tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            INSERT INTO identities
                                (id, email, password, is_confirmed, created_at, updated_at)
                            VALUES
                                ($1, $2, $3, $4, $5, $6)
                            RETURNING
                                id
                        "#,
                    )
                    .bind(identity.id.value)
                    .bind(&identity.email)
                    .bind(&identity.password)
                    .bind(identity.is_confirmed)
                    .bind(identity.created_at)
                    .bind(identity.updated_at)
                    .fetch_one(tx.as_mut())
                    .await
                    .map_err(|err| match err {
                        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                            AppError::EmailAlreadyRegistered
                        }
                        other => AppError::DatabaseError(other),
                    })?;
                    let id: Uuid = result.try_get("id")?;
                    Ok(Id::new(id))
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl IdentityReader for IdentityGateway {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        self.session
            .with_tx(|tx| {
                let email = email.to_owned();
                async move {
                    let result = sqlx::query(
                        r#"
                            SELECT
                                id, email, password, is_confirmed, created_at, updated_at
                            FROM
                                identities
                            WHERE email = $1
                        "#,
                    )
                    .bind(&email)
                    .fetch_optional(tx.as_mut())
                    .await?;

                    Self::map_identity(result)
                }
                .boxed()
            })
            .await
    }

    async fn find_by_id(&self, identity_id: &Id<Identity>) -> AppResult<Option<Identity>> {
        self.session
            .with_tx(|tx| {
                let identity_id = identity_id.value;
                async move {
                    let result = sqlx::query(
                        r#"
                            SELECT
                                id, email, password, is_confirmed, created_at, updated_at
                            FROM
                                identities
                            WHERE id = $1
                        "#,
                    )
                    .bind(identity_id)
                    .fetch_optional(tx.as_mut())
                    .await?;

                    Self::map_identity(result)
                }
                .boxed()
            })
            .await
    }
}
