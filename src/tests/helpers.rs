#![cfg(test)]

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::application::interface::crypto::CredentialsHasher;
use crate::application::session_store::{SessionPhase, SessionSnapshot};
use crate::domain::entities::id::Id;
use crate::infra::state::AppState;

pub const PASSWORD: &str = "Password123!";

pub fn unique_email() -> String {
    let id = Uuid::now_v7().as_simple().to_string();
    format!("{}@test.example", &id[16..])
}

pub async fn hash_password(state: &AppState, password: &str) -> String {
    state.hasher.hash_password(password).await.expect("hash password")
}

pub async fn insert_identity(pool: &PgPool, email: &str, hashed_password: &str, is_confirmed: bool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO identities (id, email, password, is_confirmed) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(Uuid::now_v7())
    .bind(email)
    .bind(hashed_password)
    .bind(is_confirmed)
    .fetch_one(pool)
    .await
    .expect("insert identity")
}

pub async fn find_identity_by_email(pool: &PgPool, email: &str) -> Option<Uuid> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM identities WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .expect("find identity by email")
}

/// Profiles and sessions go with the identity.
pub async fn delete_identity(pool: &PgPool, identity_id: Uuid) {
    sqlx::query("DELETE FROM identities WHERE id = $1")
        .bind(identity_id)
        .execute(pool)
        .await
        .expect("delete identity");
}

pub async fn insert_profile(pool: &PgPool, identity_id: Uuid, email: &str, role: &str) {
    sqlx::query("INSERT INTO profiles (id, email, role) VALUES ($1, $2, $3)")
        .bind(identity_id)
        .bind(email)
        .bind(role)
        .execute(pool)
        .await
        .expect("insert profile");
}

pub async fn count_profiles(pool: &PgPool, identity_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE id = $1")
        .bind(identity_id)
        .fetch_one(pool)
        .await
        .expect("count profiles")
}

pub async fn count_profiles_by_email(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("count profiles by email")
}

pub async fn find_profile_role(pool: &PgPool, identity_id: Uuid) -> Option<String> {
    sqlx::query_scalar::<_, String>("SELECT role FROM profiles WHERE id = $1")
        .bind(identity_id)
        .fetch_optional(pool)
        .await
        .expect("find profile role")
}

pub struct TestSession {
    pub id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn insert_session(
    pool: &PgPool,
    identity_id: Uuid,
    expires_at: DateTime<Utc>,
    refresh_expires_at: DateTime<Utc>,
) -> TestSession {
    let id = Uuid::now_v7();
    let access_token = Uuid::new_v4().as_simple().to_string();
    let refresh_token = Uuid::new_v4().as_simple().to_string();
    sqlx::query(
        "INSERT INTO auth_sessions (id, access_token, refresh_token, identity_id, expires_at, refresh_expires_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(&access_token)
    .bind(&refresh_token)
    .bind(identity_id)
    .bind(expires_at)
    .bind(refresh_expires_at)
    .execute(pool)
    .await
    .expect("insert session");

    TestSession {
        id,
        access_token,
        refresh_token,
    }
}

pub async fn insert_active_session(pool: &PgPool, identity_id: Uuid) -> TestSession {
    let now = Utc::now();
    insert_session(pool, identity_id, now + Duration::hours(1), now + Duration::days(1)).await
}

pub async fn session_exists(pool: &PgPool, session_id: Uuid) -> bool {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM auth_sessions WHERE id = $1)")
        .bind(session_id)
        .fetch_one(pool)
        .await
        .expect("session exists")
}

pub async fn find_session_id(pool: &PgPool, access_token: &str) -> Option<Uuid> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM auth_sessions WHERE access_token = $1")
        .bind(access_token)
        .fetch_optional(pool)
        .await
        .expect("find session")
}

pub fn session_cookie(session: &TestSession) -> String {
    format!(
        "access_token={}; refresh_token={}",
        session.access_token, session.refresh_token
    )
}

/// Polls the store until the listener has moved the session to `phase`.
pub async fn wait_for_phase(state: &AppState, session_id: Uuid, phase: SessionPhase) -> SessionSnapshot {
    let session_id = Id::new(session_id);
    for _ in 0..100 {
        let snapshot = state.sessions.snapshot(&session_id).await;
        if snapshot.phase == phase {
            return snapshot;
        }
        tokio::time::sleep(StdDuration::from_millis(20)).await;
    }
    panic!("session {} never reached {:?}", session_id, phase);
}
