//! The scheduler task

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use event_core::{NotificationRepository, Recipient, RecipientGroup, RepoResult};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::{DispatchFailure, DispatchReport, ScanReport, SchedulerConfig};
use crate::composer::{Message, MessageComposer};
use crate::error::{ComposeError, SchedulerError};
use crate::mail::{LinkState, MailLink, MailTransport};

/// Shortest period a ticker accepts
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Scans the event store for upcoming events and mails their participants
pub struct NotificationScheduler {
    store: Arc<dyn NotificationRepository>,
    composer: MessageComposer,
    link: Mutex<MailLink>,
    config: SchedulerConfig,
}

/// Run a store call under the configured deadline
async fn store_call<T, F>(limit: Duration, op: &'static str, call: F) -> Result<T, SchedulerError>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(SchedulerError::from),
        Err(_) => Err(SchedulerError::Timeout(op)),
    }
}

impl NotificationScheduler {
    pub fn new(
        store: Arc<dyn NotificationRepository>,
        composer: MessageComposer,
        link: MailLink,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            composer,
            link: Mutex::new(link),
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub async fn link_state(&self) -> LinkState {
        self.link.lock().await.state()
    }

    /// Periodic scan: looks `lookahead` past `now`
    pub async fn scan(&self, now: DateTime<Utc>) -> Result<ScanReport, SchedulerError> {
        self.scan_for(now, now + self.config.lookahead).await
    }

    /// Create pending rows for the events starting on `target`'s day, purge
    /// sent rows whose dispatch window has closed and deactivate events that
    /// started before `now`
    #[instrument(skip(self), fields(day = %target.date_naive()))]
    pub async fn scan_for(
        &self,
        now: DateTime<Utc>,
        target: DateTime<Utc>,
    ) -> Result<ScanReport, SchedulerError> {
        let limit = self.config.store_timeout;
        let day = target.date_naive();

        let events = store_call(
            limit,
            "events_starting_on",
            self.store.events_starting_on(day),
        )
        .await?;

        let mut report = ScanReport {
            events: events.len(),
            ..ScanReport::default()
        };

        for event in &events {
            for &user_id in &event.user_ids {
                let inserted = store_call(
                    limit,
                    "insert_pending_if_absent",
                    self.store
                        .insert_pending_if_absent(event.event_id, user_id, event.starts_at),
                )
                .await?;
                if inserted {
                    report.inserted += 1;
                }
            }
        }

        let cutoff = purge_cutoff(day, now, self.config.dispatch_window);
        report.purged = store_call(limit, "purge_sent_before", self.store.purge_sent_before(cutoff))
            .await?;

        report.closed = store_call(
            limit,
            "close_started_before",
            self.store.close_started_before(now),
        )
        .await?;

        Ok(report)
    }

    /// Mail every due reminder.
    ///
    /// Skipped with [`SchedulerError::MailUnavailable`] when the relay does not
    /// answer; pending rows are left untouched in that case.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, now: DateTime<Utc>) -> Result<DispatchReport, SchedulerError> {
        let transport = {
            let mut link = self.link.lock().await;
            link.ready_transport().await
        };
        let transport = transport.ok_or(SchedulerError::MailUnavailable)?;

        let limit = self.config.store_timeout;
        let ceiling = self.config.retry.max_attempts;

        if let Some(max_attempts) = ceiling {
            let exhausted =
                store_call(limit, "count_exhausted", self.store.count_exhausted(max_attempts))
                    .await?;
            if exhausted > 0 {
                warn!(exhausted, max_attempts, "reminders given up after repeated failures");
            }
        }

        let groups = store_call(
            limit,
            "select_due_unsent",
            self.store
                .select_due_unsent(now, self.config.dispatch_window, ceiling),
        )
        .await?;

        let recipient_count: usize = groups.iter().map(|g| g.recipients.len()).sum();
        let mut report = DispatchReport {
            events: groups.len(),
            delivered: 0,
            failures: Vec::with_capacity(recipient_count),
        };

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_sends.max(1)));
        let mut tasks = JoinSet::new();

        for group in groups {
            let event_id = group.event_id;
            let message = match self.compose(group).await {
                Ok(message) => Arc::new(message),
                Err(reason) => {
                    warn!(%event_id, %reason, "reminder not composed");
                    report
                        .failures
                        .push(DispatchFailure::Compose { event_id, reason });
                    continue;
                }
            };

            for recipient in message.recipients.clone() {
                tasks.spawn(deliver(
                    Arc::clone(&self.store),
                    Arc::clone(&transport),
                    Arc::clone(&message),
                    recipient,
                    Arc::clone(&semaphore),
                    limit,
                ));
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(failure)) => report.failures.push(failure),
                Err(e) => error!(error = %e, "reminder task did not complete"),
            }
        }

        Ok(report)
    }

    async fn compose(&self, group: RecipientGroup) -> Result<Message, String> {
        let event = store_call(
            self.config.store_timeout,
            "event_for_message",
            self.store.event_for_message(group.event_id),
        )
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| ComposeError::EventGone(group.event_id).to_string())?;

        self.composer
            .compose(&event, group.recipients)
            .await
            .map_err(|e| e.to_string())
    }

    /// Run the scheduler until `cancel` fires
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        info!(
            scan_every = ?self.config.scan_interval,
            dispatch_every = ?self.config.dispatch_interval,
            "notification scheduler starting"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!("notification scheduler cancelled during startup");
                return;
            }
            () = self.startup() => {}
        }

        let scan_period = self.config.scan_interval.max(MIN_PERIOD);
        let dispatch_period = self.config.dispatch_interval.max(MIN_PERIOD);
        let start = Instant::now();

        let mut scan_ticker = interval_at(start + scan_period, scan_period);
        let mut dispatch_ticker = interval_at(start + dispatch_period, dispatch_period);
        scan_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        dispatch_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = scan_ticker.tick() => {
                    self.log_scan(self.scan(Utc::now()).await);
                }
                _ = dispatch_ticker.tick() => {
                    self.log_dispatch(self.dispatch(Utc::now()).await);
                }
            }
        }

        info!("notification scheduler stopped");
    }

    /// Spawn [`run`](Self::run) on the runtime
    pub fn spawn(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn startup(&self) {
        self.link.lock().await.connect().await;

        // Events later today were never picked up by a lookahead scan.
        let now = Utc::now();
        self.log_scan(self.scan_for(now, now).await);
        self.log_dispatch(self.dispatch(now).await);
    }

    fn log_scan(&self, result: Result<ScanReport, SchedulerError>) {
        match result {
            Ok(report) => info!(
                events = report.events,
                inserted = report.inserted,
                purged = report.purged,
                closed = report.closed,
                "scan finished"
            ),
            Err(e) => error!(error = %e, transient = e.is_transient(), "scan failed"),
        }
    }

    fn log_dispatch(&self, result: Result<DispatchReport, SchedulerError>) {
        match result {
            Ok(report) if report.is_success() => info!(
                events = report.events,
                delivered = report.delivered,
                "dispatch finished"
            ),
            Ok(report) => {
                for failure in &report.failures {
                    warn!(%failure, "reminder not delivered");
                }
                error!(
                    events = report.events,
                    delivered = report.delivered,
                    failed = report.failures.len(),
                    "dispatch finished with failures"
                );
            }
            Err(SchedulerError::MailUnavailable) => {
                warn!("mail relay unavailable, dispatch skipped");
            }
            Err(e) => error!(error = %e, transient = e.is_transient(), "dispatch failed"),
        }
    }
}

/// A sent row stays until the day it was scheduled for is over and its
/// dispatch window has closed, so a rescan of that day cannot recreate it
fn purge_cutoff(day: NaiveDate, now: DateTime<Utc>, window: chrono::Duration) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc().min(now - window)
}

/// Mail one recipient and record the outcome on its pending row
async fn deliver(
    store: Arc<dyn NotificationRepository>,
    transport: Arc<dyn MailTransport>,
    message: Arc<Message>,
    recipient: Recipient,
    semaphore: Arc<Semaphore>,
    limit: Duration,
) -> Result<(), DispatchFailure> {
    let event_id = message.event_id;
    let user_id = recipient.user_id;
    let failure = |reason: String| DispatchFailure::Delivery {
        event_id,
        user_id,
        reason,
    };

    let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|e| failure(e.to_string()))?;

    match transport.send(&recipient.email, &message).await {
        Ok(()) => {
            store_call(limit, "mark_sent", store.mark_sent(event_id, user_id))
                .await
                .map_err(|e| failure(e.to_string()))?;
            debug!(%event_id, %user_id, "reminder sent");
            Ok(())
        }
        Err(send_err) => {
            let recorded =
                store_call(limit, "record_failure", store.record_failure(event_id, user_id)).await;
            if let Err(e) = recorded {
                warn!(%event_id, %user_id, error = %e, "delivery failure not recorded");
            }
            Err(failure(send_err.to_string()))
        }
    }
}
