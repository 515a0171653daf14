use axum::{Json, response::Html};
use utoipa::{
    Modify, OpenApi,
    openapi::{
        OpenApi as OpenApiDoc,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};

use crate::adapter::http::{
    app_error_impl::ErrorResponse,
    routes::{auth, form, profile},
    schema::{
        auth::{
            CurrentUserResponse, LoginRequest, LoginResponse, MessageResponse, ProfileSlotResponse,
            SessionStateResponse, SignUpRequest, SignUpResponse,
        },
        form::FormSubmittedResponse,
        profile::{ProfileResponse, UpdateProfileRequest},
    },
};

/// Names the access cookie; the refresh cookie travels alongside it.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut OpenApiDoc) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookieAuth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("access_token"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Foundation portal API"),
    modifiers(&SecurityAddon),
    paths(
        auth::signup,
        auth::login,
        auth::logout,
        auth::session,
        profile::get_me,
        profile::update_me,
        form::submit_form
    ),
    components(
        schemas(
            ErrorResponse,
            SignUpRequest,
            SignUpResponse,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            CurrentUserResponse,
            ProfileSlotResponse,
            SessionStateResponse,
            ProfileResponse,
            UpdateProfileRequest,
            FormSubmittedResponse
        )
    ),
    tags(
        (name = "Auth", description = "Sign-up, sign-in and session state"),
        (name = "Profiles", description = "Profile of the signed-in identity"),
        (name = "Forms", description = "Public form submissions")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<OpenApiDoc> {
    Json(ApiDoc::openapi())
}

pub async fn docs_ui() -> Html<&'static str> {
    Html(
        r#"
            <!doctype html>
            <html>
              <head>
                <title>Foundation portal API</title>
                <meta charset="utf-8">
                <meta name="viewport" content="width=device-width, initial-scale=1">
                <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
                <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
              </head>
              <body style="height: 100%; margin: 0;">
                <elements-api
                  apiDescriptionUrl="openapi.json"
                  basePath="/"
                  router="hash"
                />
              </body>
            </html>
        "#,
    )
}
