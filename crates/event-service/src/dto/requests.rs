//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`; the query struct only
//! deserializes and is checked by the service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

/// Upper bound on images attached to one event
pub const MAX_IMAGES_PER_EVENT: usize = 10;

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "Login must be 3-32 characters"))]
    pub login: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Login is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// Event Requests
// ============================================================================

/// Image sent inline with an event
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct ImageUpload {
    /// Original client-side name; only its extension is kept
    #[serde(default)]
    pub filename: Option<String>,
    pub base64_data: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 200, message = "Place must be 1-200 characters"))]
    pub place: String,

    #[validate(range(min = 1, max = 100000, message = "Capacity must be between 1 and 100000"))]
    pub max_participants: i32,

    pub starts_at: DateTime<Utc>,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 images per event"))]
    pub images: Vec<ImageUpload>,
}

/// `GET /events` query. Dates are whole UTC days, `to` inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            login: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22x".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            login: "al".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("login"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_create_event_deserialize_and_validate() {
        let json = r#"{
            "title": "Rust meetup",
            "place": "Hall A",
            "max_participants": 30,
            "starts_at": "2030-05-17T18:30:00Z",
            "images": [{"filename": "poster.png", "base64_data": "aGVsbG8="}]
        }"#;
        let request: CreateEventRequest = serde_json::from_str(json).unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.description, "");
        assert_eq!(request.images.len(), 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let request = CreateEventRequest {
            title: "x".to_string(),
            description: String::new(),
            place: "y".to_string(),
            max_participants: 0,
            starts_at: Utc::now(),
            images: Vec::new(),
        };
        assert!(request.validate().is_err());
    }
}
