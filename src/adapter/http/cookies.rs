use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::application::dto::session::SessionTokensDTO;
use crate::infra::config::SessionConfig;

fn build_cookie(name: &str, value: String, max_age: Duration, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value))
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(config.cookie_http_only)
        .secure(config.cookie_secure)
        .max_age(max_age)
        .build()
}

/// Sets both session cookies. They outlive the access token so an expired
/// access token can still be rotated with the refresh token.
pub fn with_session_cookies(jar: CookieJar, tokens: &SessionTokensDTO, config: &SessionConfig) -> CookieJar {
    let max_age = Duration::seconds(config.refresh_ttl);
    jar.add(build_cookie(
        &config.access_cookie_name,
        tokens.access_token.clone(),
        max_age,
        config,
    ))
    .add(build_cookie(
        &config.refresh_cookie_name,
        tokens.refresh_token.clone(),
        max_age,
        config,
    ))
}

pub fn without_session_cookies(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.add(build_cookie(&config.access_cookie_name, String::new(), Duration::ZERO, config))
        .add(build_cookie(&config.refresh_cookie_name, String::new(), Duration::ZERO, config))
}

pub struct SessionCookies {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Reads the session cookies. `None` when there is no non-empty access token.
pub fn read_session_cookies(jar: &CookieJar, config: &SessionConfig) -> Option<SessionCookies> {
    let access_token = jar
        .get(&config.access_cookie_name)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())?;
    let refresh_token = jar
        .get(&config.refresh_cookie_name)
        .map(Cookie::value)
        .filter(|value| !value.is_empty())
        .map(str::to_owned);

    Some(SessionCookies {
        access_token: access_token.to_owned(),
        refresh_token,
    })
}
