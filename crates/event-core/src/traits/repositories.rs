//! Repository traits (ports) - define the interface for data access
//!
//! The store is split by role. Request handlers work through the user,
//! event and reservation repositories; the reminder scheduler only ever
//! sees [`NotificationRepository`], which limits it to reading events,
//! flipping `sent`, recording failures and purging.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::entities::{
    Event, NewEvent, NewTicket, NewUser, RecipientGroup, ScheduledEvent, Ticket, TicketStatus,
    User,
};
use crate::error::DomainError;
use crate::value_objects::{EventId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, failing with `LoginTaken` on a duplicate login
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User>;

    /// Find user by login
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>>;

    /// Delete a user together with their reservations and tickets
    async fn delete(&self, id: UserId) -> RepoResult<()>;
}

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert an event and its images
    async fn create(&self, event: &NewEvent) -> RepoResult<Event>;

    /// Find event by ID, images included
    async fn find_by_id(&self, id: EventId) -> RepoResult<Option<Event>>;

    /// Active events starting in `[from, to)`, one page at a time.
    /// Returns the page and the total number of pages.
    async fn list_upcoming(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        page: u32,
        limit: u32,
    ) -> RepoResult<(Vec<Event>, u32)>;

    /// Events the user holds a reservation for
    async fn list_by_participant(&self, user_id: UserId) -> RepoResult<Vec<Event>>;

    /// Stop accepting reservations. Fails with `NotEventOwner` when the
    /// event exists but belongs to someone else.
    async fn close(&self, owner_id: UserId, event_id: EventId) -> RepoResult<()>;

    /// Delete the event and everything hanging off it.
    /// Returns the image filenames so the caller can remove the files.
    async fn delete(&self, owner_id: UserId, event_id: EventId) -> RepoResult<Vec<String>>;
}

// ============================================================================
// Reservation Repository
// ============================================================================

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Reserve a seat and store its ticket in one transaction.
    ///
    /// Errors: `AlreadyReserved` for a duplicate pair, `EventNotFound` for a
    /// missing event, `CapacityOrClosed` when the event is full, closed or
    /// already started. Nothing is written on error.
    async fn add_reservation(&self, ticket: &NewTicket) -> RepoResult<Ticket>;

    /// Release a seat, its ticket and its pending reminder in one transaction.
    ///
    /// Errors: `EventNotFound` when the event is gone, `ReservationNotFound`
    /// when the event exists but the user holds no seat.
    async fn remove_reservation(&self, event_id: EventId, user_id: UserId) -> RepoResult<()>;

    /// Find a ticket row by its token
    async fn find_ticket(&self, token: &str) -> RepoResult<Option<Ticket>>;

    /// All tickets held by a user, newest first
    async fn list_tickets(&self, user_id: UserId) -> RepoResult<Vec<Ticket>>;

    /// Move a ticket from `expected` to `status`.
    /// Returns false when the ticket was not in `expected`.
    async fn set_ticket_status(
        &self,
        token: &str,
        expected: TicketStatus,
        status: TicketStatus,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Active events starting on `date` (UTC), each with the reserved users
    /// that have no pending row yet
    async fn events_starting_on(&self, date: NaiveDate) -> RepoResult<Vec<ScheduledEvent>>;

    /// Insert a pending row unless one exists. Returns whether a row was inserted.
    async fn insert_pending_if_absent(
        &self,
        event_id: EventId,
        user_id: UserId,
        scheduled_at: DateTime<Utc>,
    ) -> RepoResult<bool>;

    /// Unsent rows scheduled within `window` of `now`, grouped by event in
    /// start order. Rows with `attempts >= max_attempts` are skipped when a
    /// ceiling is given.
    async fn select_due_unsent(
        &self,
        now: DateTime<Utc>,
        window: Duration,
        max_attempts: Option<u32>,
    ) -> RepoResult<Vec<RecipientGroup>>;

    /// Number of unsent rows that reached the attempt ceiling
    async fn count_exhausted(&self, max_attempts: u32) -> RepoResult<u64>;

    async fn mark_sent(&self, event_id: EventId, user_id: UserId) -> RepoResult<()>;

    /// Bump the failed-attempt counter of an unsent row
    async fn record_failure(&self, event_id: EventId, user_id: UserId) -> RepoResult<()>;

    /// Delete sent rows scheduled before `cutoff`. Returns the number removed.
    async fn purge_sent_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;

    /// Deactivate events that started before `cutoff`. Returns the number closed.
    async fn close_started_before(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;

    /// Load an event with its images for message composition
    async fn event_for_message(&self, event_id: EventId) -> RepoResult<Option<Event>>;
}
