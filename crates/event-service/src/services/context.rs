//! Service context - dependency container for services
//!
//! Holds the repositories, the object store and the signing services the
//! request handlers need. The scheduler has its own narrower wiring.

use std::sync::Arc;

use event_common::auth::{JwtService, PasswordService};
use event_common::{AppConfig, TicketCodec};
use event_core::traits::{EventRepository, ReservationRepository, UserRepository};
use event_notify::ObjectStore;

use super::error::{ServiceError, ServiceResult};

/// Tunables the services read on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Lifetime of a freshly issued ticket
    pub ticket_ttl_hours: i64,
    /// Largest decoded image accepted on event creation
    pub max_image_bytes: usize,
    pub max_images: usize,
}

impl ServiceSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ticket_ttl_hours: config.ticket.ttl_hours,
            max_image_bytes: config.storage.max_file_size_bytes(),
            ..Self::default()
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            ticket_ttl_hours: 24,
            max_image_bytes: 10 * 1024 * 1024,
            max_images: crate::dto::requests::MAX_IMAGES_PER_EVENT,
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    event_repo: Arc<dyn EventRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,

    // Storage
    object_store: Arc<dyn ObjectStore>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    ticket_codec: Arc<TicketCodec>,

    settings: ServiceSettings,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    pub fn reservation_repo(&self) -> &dyn ReservationRepository {
        self.reservation_repo.as_ref()
    }

    // === Storage ===

    pub fn object_store(&self) -> &dyn ObjectStore {
        self.object_store.as_ref()
    }

    /// Shared handle, for components that outlive a request
    pub fn object_store_handle(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.object_store)
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn ticket_codec(&self) -> &TicketCodec {
        self.ticket_codec.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("object_store", &"dyn ObjectStore")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    event_repo: Option<Arc<dyn EventRepository>>,
    reservation_repo: Option<Arc<dyn ReservationRepository>>,
    object_store: Option<Arc<dyn ObjectStore>>,
    jwt_service: Option<Arc<JwtService>>,
    ticket_codec: Option<Arc<TicketCodec>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn reservation_repo(mut self, repo: Arc<dyn ReservationRepository>) -> Self {
        self.reservation_repo = Some(repo);
        self
    }

    pub fn object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn ticket_codec(mut self, codec: Arc<TicketCodec>) -> Self {
        self.ticket_codec = Some(codec);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            event_repo: required(self.event_repo, "event_repo")?,
            reservation_repo: required(self.reservation_repo, "reservation_repo")?,
            object_store: required(self.object_store, "object_store")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            ticket_codec: required(self.ticket_codec, "ticket_codec")?,
            settings: self.settings,
        })
    }
}
