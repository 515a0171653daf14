use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::adapter::events::broadcast::BroadcastAuthEvents;
use crate::adapter::http::app_error_impl::ErrorResponse;
use crate::adapter::http::cookies::{with_session_cookies, without_session_cookies};
use crate::adapter::http::middleware::extractor::AuthUser;
use crate::adapter::http::schema::auth::{
    LoginRequest, LoginResponse, MessageResponse, SessionStateResponse, SignUpRequest, SignUpResponse,
};
use crate::adapter::http::validation::ValidJson;
use crate::application::app_error::AppResult;
use crate::application::dto::auth::{SignInDTO, SignOutDTO, SignUpDTO};
use crate::application::interactors::auth::{SignInInteractor, SignOutInteractor, SignUpInteractor};
use crate::application::interface::events::{AuthEvent, AuthEventPublisher};
use crate::application::session_store::{CurrentUser, SessionPhase, SessionSnapshot, SessionStore};
use crate::domain::entities::profile::Role;
use crate::infra::config::AppConfig;

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Auth",
    request_body(
        content = SignUpRequest,
        example = json!(
            {
                "email": "founder@example.com",
                "password": "Password123!",
                "role": "founder",
                "full_name": "Ada Lovelace"
            }
        )
    ),
    responses(
        (
            status = 201,
            description = "Identity and profile created. Session cookies are set when no email confirmation is required",
            body = SignUpResponse,
            example = json!(
                {
                    "identity_id": "01946d43-55f2-7c3e-9b1a-3f2d6c1e8a90",
                    "signed_in": true
                }
            )
        ),
        (
            status = 400,
            description = "Invalid email, password or role",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Invalid role: admin"
                }
            )
        ),
        (
            status = 409,
            description = "Email already registered",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Email is already registered"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Internal Server Error"
                }
            )
        )
    )
)]
pub async fn signup(
    interactor: SignUpInteractor,
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = SignUpDTO {
        email: payload.email.to_string(),
        password: payload.password,
        role: payload.role.unwrap_or_else(|| Role::default().to_string()),
        full_name: payload.full_name,
        require_email_confirmation: config.auth.require_email_confirmation,
        ttls: config.session.ttls(),
    };
    let result = interactor.execute(dto).await?;
    let (jar, signed_in) = match &result.session {
        Some(tokens) => (with_session_cookies(jar, tokens, &config.session), true),
        None => (jar, false),
    };
    Ok((
        StatusCode::CREATED,
        jar,
        Json(SignUpResponse {
            identity_id: result.identity_id,
            signed_in,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body(
        content = LoginRequest,
        example = json!(
            {
                "email": "founder@example.com",
                "password": "Password123!"
            }
        )
    ),
    responses(
        (
            status = 200,
            description = "Login successful, access and refresh cookies are set",
            body = LoginResponse
        ),
        (
            status = 401,
            description = "Invalid email or password",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Invalid credentials"
                }
            )
        ),
        (
            status = 403,
            description = "Email is not confirmed",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Email is not confirmed"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Internal Server Error"
                }
            )
        )
    )
)]
pub async fn login(
    interactor: SignInInteractor,
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let dto = SignInDTO {
        email: payload.email,
        password: payload.password,
        ttls: config.session.ttls(),
    };
    let tokens = interactor.execute(dto).await?;
    let jar = with_session_cookies(jar, &tokens, &config.session);
    Ok((
        StatusCode::OK,
        jar,
        Json(LoginResponse {
            identity_id: tokens.identity_id,
            expires_at: tokens.expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (
            status = 200,
            description = "Logged out successfully, cookies are cleared",
            body = MessageResponse,
            example = json!(
                {
                    "message": "Logged out successfully"
                }
            )
        ),
        (
            status = 401,
            description = "Missing or invalid session",
            body = ErrorResponse,
            example = json!(
                {
                    "error": "Not authenticated"
                }
            )
        ),
        (
            status = 500,
            description = "Internal server error",
            body = ErrorResponse
        )
    ),
    security(("cookieAuth" = []))
)]
pub async fn logout(
    auth_user: AuthUser,
    interactor: SignOutInteractor,
    State(config): State<Arc<AppConfig>>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let dto = SignOutDTO {
        session_id: auth_user.session_id.to_string(),
    };
    interactor.execute(dto).await?;
    Ok((
        StatusCode::OK,
        without_session_cookies(jar, &config.session),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "Auth",
    responses(
        (
            status = 200,
            description = "Current user and profile state of the calling session",
            body = SessionStateResponse,
            example = json!(
                {
                    "phase": "ready",
                    "user": { "id": "01946d43-55f2-7c3e-9b1a-3f2d6c1e8a90", "email": "founder@example.com" },
                    "profile": { "status": "missing" }
                }
            )
        )
    )
)]
pub async fn session(
    State(sessions): State<Arc<SessionStore>>,
    State(events): State<Arc<BroadcastAuthEvents>>,
    auth_user: Option<AuthUser>,
) -> Json<SessionStateResponse> {
    let Some(user) = auth_user else {
        return Json(SessionSnapshot::unauthenticated().into());
    };

    let snapshot = sessions.snapshot(&user.session_id).await;
    if snapshot.phase != SessionPhase::Unauthenticated {
        return Json(snapshot.into());
    }

    // Valid session the store has not seen, e.g. issued before a restart.
    debug!("Restoring untracked session {}", user.session_id);
    events.publish(AuthEvent::SessionRestored {
        session_id: user.session_id,
        identity_id: user.identity_id,
        refresh_expires_at: user.refresh_expires_at,
    });
    Json(
        SessionSnapshot::loading(CurrentUser {
            identity_id: user.identity_id,
            email: None,
        })
        .into(),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::application::session_store::SessionPhase;
    use crate::infra::app::create_app;
    use crate::infra::state::AppState;
    use crate::tests::fixtures::{init_test_app_state, lazy_app_state};
    use crate::tests::helpers::{
        PASSWORD, count_profiles_by_email, delete_identity, find_identity_by_email, find_profile_role, find_session_id,
        hash_password, insert_active_session, insert_identity, session_cookie, session_exists, unique_email, wait_for_phase,
    };

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn set_cookies(response: &axum::response::Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn access_token_from(cookies: &[String]) -> String {
        let cookie = cookies
            .iter()
            .find(|c| c.starts_with("access_token="))
            .expect("access cookie");
        cookie.trim_start_matches("access_token=").split(';').next().unwrap().to_string()
    }

    // === signup ===

    #[rstest]
    #[tokio::test]
    #[serial]
    async fn test_signup_creates_profile_and_signs_in(#[future] init_test_app_state: anyhow::Result<AppState>) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());
        let email = unique_email();

        let request = post_json(
            "/auth/signup",
            json!({ "email": email, "password": PASSWORD, "role": "founder", "full_name": "Ada Lovelace" }),
        );
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let cookies = set_cookies(&response);
        let json = body_json(response).await;

        let identity_id = find_identity_by_email(&state.pool, &email).await.expect("identity created");
        let role = find_profile_role(&state.pool, identity_id).await;
        delete_identity(&state.pool, identity_id).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["signed_in"], true);
        assert_eq!(json["identity_id"], identity_id.to_string());
        assert_eq!(role.as_deref(), Some("founder"));
        assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
        assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
    }

    #[rstest]
    #[tokio::test]
    #[serial]
    async fn test_signup_duplicate_email_conflicts(#[future] init_test_app_state: anyhow::Result<AppState>) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());
        let email = unique_email();
        let hashed = hash_password(&state, PASSWORD).await;
        let identity_id = insert_identity(&state.pool, &email, &hashed, true).await;

        let request = post_json("/auth/signup", json!({ "email": email, "password": PASSWORD, "role": "expert" }));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let profiles = count_profiles_by_email(&state.pool, &email).await;
        delete_identity(&state.pool, identity_id).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(profiles, 0, "no profile may be written for a rejected sign-up");
    }

    #[rstest]
    #[case(json!({ "email": "not-an-email", "password": PASSWORD }))]
    #[case(json!({ "email": "a@example.com", "password": "weak" }))]
    #[case(json!({ "email": "a@example.com", "password": PASSWORD, "role": "admin" }))]
    #[tokio::test]
    #[serial]
    async fn test_signup_rejects_invalid_input(
        #[future] init_test_app_state: anyhow::Result<AppState>,
        #[case] body: Value,
    ) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());

        let response = app.oneshot(post_json("/auth/signup", body)).await.unwrap();

        assert!(response.status().is_client_error(), "got {}", response.status());
    }

    // === login ===

    #[rstest]
    #[tokio::test]
    #[serial]
    async fn test_login_sets_cookies_and_loads_profile(#[future] init_test_app_state: anyhow::Result<AppState>) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());
        let email = unique_email();
        let hashed = hash_password(&state, PASSWORD).await;
        let identity_id = insert_identity(&state.pool, &email, &hashed, true).await;

        let response = app
            .oneshot(post_json("/auth/login", json!({ "email": email, "password": PASSWORD })))
            .await
            .unwrap();
        let status = response.status();
        let cookies = set_cookies(&response);
        let access_token = access_token_from(&cookies);
        let session_id = find_session_id(&state.pool, &access_token).await.expect("session stored");
        let snapshot = wait_for_phase(&state, session_id, SessionPhase::Ready).await;
        let role = find_profile_role(&state.pool, identity_id).await;
        delete_identity(&state.pool, identity_id).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(access_token.len(), 64, "access token is 32 random bytes in hex");
        assert!(Uuid::parse_str(&access_token).is_err(), "access token is not the session id");
        assert_eq!(snapshot.user.and_then(|u| u.email), Some(email));
        assert_eq!(role.as_deref(), Some("interested"), "missing profile is created with the default role");
    }

    #[rstest]
    #[case("WrongPassword1!", true, StatusCode::UNAUTHORIZED)]
    #[case(PASSWORD, false, StatusCode::FORBIDDEN)]
    #[tokio::test]
    #[serial]
    async fn test_login_failures(
        #[future] init_test_app_state: anyhow::Result<AppState>,
        #[case] password: &str,
        #[case] confirmed: bool,
        #[case] expected: StatusCode,
    ) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());
        let email = unique_email();
        let hashed = hash_password(&state, PASSWORD).await;
        let identity_id = insert_identity(&state.pool, &email, &hashed, confirmed).await;

        let response = app
            .oneshot(post_json("/auth/login", json!({ "email": email, "password": password })))
            .await
            .unwrap();
        let status = response.status();
        let has_cookie = response.headers().get(SET_COOKIE).is_some();
        delete_identity(&state.pool, identity_id).await;

        assert_eq!(status, expected);
        assert!(!has_cookie);
    }

    #[rstest]
    #[tokio::test]
    #[serial]
    async fn test_login_unknown_email(#[future] init_test_app_state: anyhow::Result<AppState>) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());

        let response = app
            .oneshot(post_json("/auth/login", json!({ "email": unique_email(), "password": PASSWORD })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // === logout ===

    #[rstest]
    #[tokio::test]
    #[serial]
    async fn test_logout_clears_session(#[future] init_test_app_state: anyhow::Result<AppState>) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());
        let email = unique_email();
        let hashed = hash_password(&state, PASSWORD).await;
        let identity_id = insert_identity(&state.pool, &email, &hashed, true).await;
        let session = insert_active_session(&state.pool, identity_id).await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .header(COOKIE, session_cookie(&session))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let cookies = set_cookies(&response);
        let still_exists = session_exists(&state.pool, session.id).await;
        delete_identity(&state.pool, identity_id).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!still_exists);
        assert!(cookies.iter().any(|c| c.starts_with("access_token=;")));
    }

    #[rstest]
    #[tokio::test]
    async fn test_logout_without_session_is_unauthorized(lazy_app_state: AppState) {
        let app = create_app(lazy_app_state.config.as_ref(), lazy_app_state.clone());
        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // === session ===

    #[rstest]
    #[tokio::test]
    async fn test_session_anonymous(lazy_app_state: AppState) {
        let app = create_app(lazy_app_state.config.as_ref(), lazy_app_state.clone());
        let request = Request::builder().uri("/auth/session").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let json = body_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "phase": "unauthenticated", "user": null, "profile": null }));
    }

    #[rstest]
    #[tokio::test]
    #[serial]
    async fn test_session_restores_untracked_session(#[future] init_test_app_state: anyhow::Result<AppState>) {
        let state = init_test_app_state.await.expect("init app state");
        let app = create_app(state.config.as_ref(), state.clone());
        let email = unique_email();
        let hashed = hash_password(&state, PASSWORD).await;
        let identity_id = insert_identity(&state.pool, &email, &hashed, true).await;
        let session = insert_active_session(&state.pool, identity_id).await;

        let request = Request::builder()
            .uri("/auth/session")
            .header(COOKIE, session_cookie(&session))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let json = body_json(response).await;
        let snapshot = wait_for_phase(&state, session.id, SessionPhase::Ready).await;
        delete_identity(&state.pool, identity_id).await;

        assert_eq!(json["phase"], "loading");
        assert_eq!(json["user"]["id"], identity_id.to_string());
        assert_eq!(snapshot.user.and_then(|u| u.email), Some(email));
    }
}
