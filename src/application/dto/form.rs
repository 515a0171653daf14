use serde_json::Value;

#[derive(Debug)]
pub struct SubmitFormDTO {
    pub kind: String,
    pub payload: Value,
    pub identity_id: Option<String>,
}
