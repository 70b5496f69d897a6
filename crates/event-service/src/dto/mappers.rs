//! Entity to DTO mappers

use event_core::{Event, Ticket, User};

use super::responses::{EventResponse, EventSummary, TicketResponse, UserResponse};

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl EventResponse {
    /// Combine an event with the already-resolved links of its images
    pub fn with_image_urls(event: Event, images: Vec<String>) -> Self {
        Self {
            id: event.id,
            owner_id: event.owner_id,
            seats_left: event.seats_left(),
            title: event.title,
            description: event.description,
            place: event.place,
            participants: event.participants,
            max_participants: event.max_participants,
            starts_at: event.starts_at,
            active: event.active,
            images,
            created_at: event.created_at,
        }
    }
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            place: event.place.clone(),
            starts_at: event.starts_at,
            active: event.active,
        }
    }
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        Self {
            token: ticket.token,
            event_id: ticket.event_id,
            status: ticket.status,
            expires_at: ticket.expires_at,
        }
    }
}
