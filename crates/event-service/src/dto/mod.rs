//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateEventRequest, ImageUpload, ListEventsQuery, LoginRequest, RefreshTokenRequest,
    RegisterRequest,
};
pub use responses::{
    AuthResponse, EventPageResponse, EventResponse, EventSummary, HealthResponse,
    ReadinessResponse, ReservationResponse, TicketCheckResponse, TicketResponse, UserResponse,
};
