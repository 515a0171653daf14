//! Redirects unauthenticated navigation to protected pages toward the login
//! page, keeping the original destination in `redirectTo`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    adapter::http::{
        cookies::{read_session_cookies, with_session_cookies, without_session_cookies},
        middleware::auth::authenticate,
    },
    application::interactors::session::ValidateSessionInteractor,
    infra::config::AppConfig,
};

pub const PROTECTED_PREFIXES: [&str; 6] = [
    "/dashboard",
    "/profile",
    "/founder-login",
    "/mentor-portal",
    "/investor-portal",
    "/admin",
];

const LOGIN_PATH: &str = "/login";

/// Prefix match on a segment boundary: `/admin` and `/admin/users` are
/// protected, `/administrators` is not.
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

pub fn login_redirect(path: &str) -> String {
    match serde_urlencoded::to_string([("redirectTo", path)]) {
        Ok(query) => format!("{}?{}", LOGIN_PATH, query),
        Err(_) => LOGIN_PATH.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    /// Needs a session; the token, if any, still has to be checked.
    Check,
    Redirect(String),
}

pub fn guard_decision(path: &str, has_access_token: bool) -> GuardDecision {
    if !is_protected(path) {
        return GuardDecision::Pass;
    }
    if has_access_token {
        GuardDecision::Check
    } else {
        GuardDecision::Redirect(login_redirect(path))
    }
}

pub async fn route_guard(
    State(config): State<Arc<AppConfig>>,
    interactor: ValidateSessionInteractor,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let has_access_token = read_session_cookies(&jar, &config.session).is_some();

    match guard_decision(&path, has_access_token) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(location) => {
            debug!("Redirecting anonymous request for {} to login", path);
            Redirect::temporary(&location).into_response()
        }
        GuardDecision::Check => match authenticate(&interactor, &jar, &config).await {
            Ok(Some((_, None))) => next.run(request).await,
            Ok(Some((_, Some(rotation)))) => {
                let response = next.run(request).await;
                (
                    with_session_cookies(CookieJar::new(), &rotation.tokens, &config.session),
                    response,
                )
                    .into_response()
            }
            Ok(None) => {
                debug!("Stale session on {}, redirecting to login", path);
                (
                    without_session_cookies(CookieJar::new(), &config.session),
                    Redirect::temporary(&login_redirect(&path)),
                )
                    .into_response()
            }
            Err(err) => {
                error!("Route guard failed to validate session: {}", err);
                err.into_response()
            }
        },
    }
}
