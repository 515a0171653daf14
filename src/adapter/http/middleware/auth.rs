use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    adapter::http::{
        cookies::{read_session_cookies, with_session_cookies},
        middleware::extractor::AuthUser,
    },
    application::{
        app_error::{AppError, AppResult},
        dto::session::{SessionTokensDTO, SessionValidationResult, ValidateSessionDTO},
        interactors::session::ValidateSessionInteractor,
    },
    infra::config::AppConfig,
};

/// Tokens of a session that was rotated while handling the request.
#[derive(Debug, Clone)]
pub struct SessionRotation {
    pub tokens: SessionTokensDTO,
}

/// Resolves the session cookies to an authenticated user. `Ok(None)` means
/// the request carries no usable session.
pub async fn authenticate(
    interactor: &ValidateSessionInteractor,
    jar: &CookieJar,
    config: &AppConfig,
) -> AppResult<Option<(AuthUser, Option<SessionRotation>)>> {
    let Some(cookies) = read_session_cookies(jar, &config.session) else {
        return Ok(None);
    };
    let dto = ValidateSessionDTO {
        access_token: cookies.access_token,
        refresh_token: cookies.refresh_token,
        ttls: config.session.ttls(),
    };

    match interactor.execute(dto).await? {
        SessionValidationResult::Valid {
            identity_id,
            session_id,
            refresh_expires_at,
        } => Ok(Some((
            AuthUser {
                identity_id,
                session_id,
                refresh_expires_at,
            },
            None,
        ))),
        SessionValidationResult::Rotated {
            identity_id,
            session_id,
            tokens,
        } => Ok(Some((
            AuthUser {
                identity_id,
                session_id,
                refresh_expires_at: tokens.refresh_expires_at,
            },
            Some(SessionRotation { tokens }),
        ))),
        SessionValidationResult::Expired | SessionValidationResult::Invalid => Ok(None),
    }
}

fn attach(request: &mut Request, user: AuthUser, rotation: Option<SessionRotation>) {
    request.extensions_mut().insert(user);
    if let Some(rotation) = rotation {
        request.extensions_mut().insert(rotation);
    }
}

pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    interactor: ValidateSessionInteractor,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let (user, rotation) = authenticate(&interactor, &jar, &config)
        .await?
        .ok_or(AppError::NotAuthenticated)?;
    attach(&mut request, user, rotation);
    Ok(next.run(request).await)
}

/// Like `auth_middleware`, but lets anonymous requests through.
pub async fn optional_auth_middleware(
    State(config): State<Arc<AppConfig>>,
    interactor: ValidateSessionInteractor,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    if let Some((user, rotation)) = authenticate(&interactor, &jar, &config).await? {
        attach(&mut request, user, rotation);
    }
    Ok(next.run(request).await)
}

/// Re-issues both cookies when the auth middleware rotated the session.
pub async fn session_cookie_middleware(
    State(config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let rotated = request.extensions().get::<SessionRotation>().cloned();
    let response = next.run(request).await;
    match rotated {
        Some(rotation) => (
            with_session_cookies(CookieJar::new(), &rotation.tokens, &config.session),
            response,
        )
            .into_response(),
        None => response,
    }
}
