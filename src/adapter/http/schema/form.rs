use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct FormSubmittedResponse {
    pub id: String,
    pub kind: String,
}
