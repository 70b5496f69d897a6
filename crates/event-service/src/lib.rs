//! # event-service
//!
//! Application layer containing the use cases, DTOs and the service error type.

pub mod dto;
pub mod services;

pub use dto::{
    AuthResponse, CreateEventRequest, EventPageResponse, EventResponse, EventSummary,
    HealthResponse, ImageUpload, ListEventsQuery, LoginRequest, ReadinessResponse,
    RefreshTokenRequest, RegisterRequest, ReservationResponse, TicketCheckResponse,
    TicketResponse, UserResponse,
};
pub use services::{
    AuthService, EventService, ImageContent, ImageService, ReservationService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ServiceSettings, TicketService,
    UserService,
};
