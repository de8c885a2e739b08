use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Guest record stored in Redis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub attendance: AttendanceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default)]
    pub notified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Guest {
    pub fn new(name: String, email: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            attendance: AttendanceState::Unknown,
            response: None,
            notified: false,
            notified_at: None,
            created_at: Utc::now(),
        }
    }
}

/// RSVP state, owned by the RSVP flow; the dispatch subsystem never touches it
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceState {
    #[default]
    Unknown,
    Attending,
    Declined,
}

/// Request to create a guest
#[derive(Debug, Deserialize)]
pub struct CreateGuestRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request to update a guest's contact details
#[derive(Debug, Deserialize)]
pub struct UpdateGuestRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// RSVP submission for one guest
#[derive(Debug, Deserialize)]
pub struct RsvpRequest {
    pub attending: bool,
    #[serde(default)]
    pub response: Option<String>,
}
