use chrono::{DateTime, Utc};
use serde_json::Value;
use std::str::FromStr;

use crate::application::app_error::AppError;
use crate::domain::entities::{id::Id, identity::Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    NetworkJoin,
    AcceleratorApplication,
    Contact,
}

impl FormKind {
    pub fn slug(&self) -> &'static str {
        match self {
            FormKind::NetworkJoin => "network-join",
            FormKind::AcceleratorApplication => "accelerator-application",
            FormKind::Contact => "contact",
        }
    }

    /// Table owning submissions of this kind. Never built from user input.
    pub fn table(&self) -> &'static str {
        match self {
            FormKind::NetworkJoin => "network_join_submissions",
            FormKind::AcceleratorApplication => "accelerator_applications",
            FormKind::Contact => "contact_messages",
        }
    }
}

impl FromStr for FormKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "network-join" => Ok(FormKind::NetworkJoin),
            "accelerator-application" => Ok(FormKind::AcceleratorApplication),
            "contact" => Ok(FormKind::Contact),
            other => Err(AppError::UnknownFormKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormSubmission {
    pub id: Id<FormSubmission>,
    pub kind: FormKind,
    pub payload: Value,
    pub submitted_by: Option<Id<Identity>>,
    pub created_at: DateTime<Utc>,
}

impl FormSubmission {
    pub fn new(kind: FormKind, payload: Value, submitted_by: Option<Id<Identity>>) -> Self {
        Self {
            id: Id::generate(),
            kind,
            payload,
            submitted_by,
            created_at: Utc::now(),
        }
    }
}
