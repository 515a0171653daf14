use async_trait::async_trait;
use futures::FutureExt;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::adapter::db::session::SqlxSession;
use crate::application::app_error::AppResult;
use crate::application::interface::gateway::profile::{ProfileReader, ProfileWriter};
use crate::domain::entities::id::Id;
use crate::domain::entities::profile::{Profile, Role};

#[derive(Clone)]
pub struct ProfileGateway {
    session: SqlxSession,
}

impl ProfileGateway {
    pub fn new(session: SqlxSession) -> Self {
        Self { session }
    }

    fn map_profile(row: PgRow) -> AppResult<Profile> {
        let role: String = row.try_get("role")?;
        Ok(Profile {
            id: Id::new(row.try_get("id")?),
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            role: role.parse::<Role>()?,
            company: row.try_get("company")?,
            bio: row.try_get("bio")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl ProfileWriter for ProfileGateway {
    async fn upsert(&self, profile: Profile) -> AppResult<Id<Profile>> {
        self.session
            .with_tx(|tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            INSERT INTO profiles
                                (id, email, full_name, role, company, bio, created_at, updated_at)
                            VALUES
                                ($1, $2, $3, $4, $5, $6, $7, $8)
                            ON CONFLICT (id) DO UPDATE SET
                                email = EXCLUDED.email,
                                full_name = COALESCE(EXCLUDED.full_name, profiles.full_name),
                                role = EXCLUDED.role,
                                updated_at = EXCLUDED.updated_at
                            RETURNING
                                id
                        "#,
                    )
                    .bind(profile.id.value)
                    .bind(&profile.email)
                    .bind(&profile.full_name)
                    .bind(profile.role.as_str())
                    .bind(&profile.company)
                    .bind(&profile.bio)
                    .bind(profile.created_at)
                    .bind(profile.updated_at)
                    .fetch_one(tx.as_mut())
                    .await?;
                    let id: Uuid = result.try_get("id")?;
                    Ok(Id::new(id))
                }
                .boxed()
            })
            .await
    }

    async fn insert_if_absent(&self, profile: Profile) -> AppResult<bool> {
        self.session
            .with_tx(|tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            INSERT INTO profiles
                                (id, email, full_name, role, company, bio, created_at, updated_at)
                            VALUES
                                ($1, $2, $3, $4, $5, $6, $7, $8)
                            ON CONFLICT (id) DO NOTHING
                        "#,
                    )
                    .bind(profile.id.value)
                    .bind(&profile.email)
                    .bind(&profile.full_name)
                    .bind(profile.role.as_str())
                    .bind(&profile.company)
                    .bind(&profile.bio)
                    .bind(profile.created_at)
                    .bind(profile.updated_at)
                    .execute(tx.as_mut())
                    .await?;
                    Ok(result.rows_affected() == 1)
                }
                .boxed()
            })
            .await
    }

    async fn update(&self, profile: Profile) -> AppResult<Id<Profile>> {
        self.session
            .with_tx(|tx| {
                async move {
                    let result = sqlx::query(
                        r#"
                            UPDATE
                                profiles
                            SET
                                full_name = $2, role = $3, company = $4, bio = $5, updated_at = $6
                            WHERE
                                id = $1
                            RETURNING
                                id
                        "#,
                    )
                    .bind(profile.id.value)
                    .bind(&profile.full_name)
                    .bind(profile.role.as_str())
                    .bind(&profile.company)
                    .bind(&profile.bio)
                    .bind(profile.updated_at)
                    .fetch_one(tx.as_mut())
                    .await?;
                    let id: Uuid = result.try_get("id")?;
                    Ok(Id::new(id))
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl ProfileReader for ProfileGateway {
    async fn find_by_id(&self, profile_id: &Id<Profile>) -> AppResult<Option<Profile>> {
        self.session
            .with_tx(|tx| {
                let profile_id = profile_id.value;
                async move {
                    let result = sqlx::query(
                        r#"
                            SELECT
                                id, email, full_name, role, company, bio, created_at, updated_at
                            FROM
                                profiles
                            WHERE id = $1
                        "#,
                    )
                    .bind(profile_id)
                    .fetch_optional(tx.as_mut())
                    .await?;

                    result.map(Self::map_profile).transpose()
                }
                .boxed()
            })
            .await
    }
}
