//! # event-notify
//!
//! Everything needed to remind participants before an event starts:
//!
//! - [`composer`] renders one HTML/plain-text message per event
//! - [`mail`] delivers it over SMTP through a reconnectable link
//! - [`storage`] stores event images and hands out signed, expiring URLs
//! - [`scheduler`] runs the scan / dispatch loop against the event store

pub mod composer;
pub mod error;
pub mod mail;
pub mod scheduler;
pub mod storage;

pub use composer::{render_html, render_text, Message, MessageComposer};
pub use error::{ComposeError, MailError, SchedulerError, StorageError};
pub use mail::{LinkState, MailConnector, MailLink, MailTransport, SmtpConnector, SmtpMailer};
pub use scheduler::{
    DispatchFailure, DispatchReport, NotificationScheduler, RetryPolicy, ScanReport,
    SchedulerConfig,
};
pub use storage::{LocalObjectStore, ObjectStore};
