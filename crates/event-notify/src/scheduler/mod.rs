//! Reminder scheduler
//!
//! Two periodic jobs share one task:
//!
//! - **scan** creates a pending row for every reservation of the events
//!   starting on the target day, then purges rows sent before that day
//! - **dispatch** mails every pending row whose event starts within the
//!   dispatch window and flips it to sent

mod config;
mod report;
mod runner;

pub use config::{RetryPolicy, SchedulerConfig};
pub use report::{DispatchFailure, DispatchReport, ScanReport};
pub use runner::NotificationScheduler;
