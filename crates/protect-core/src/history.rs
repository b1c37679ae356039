// ── History attribution ──
//
// Works out who last changed the alarm state by reading the site history
// feed. Attribution is informational only: every failure is logged at debug
// level and reads as "unknown".
//
// The attributor owns its background work (the periodic monitoring loop and
// one-shot post-write checks). Post-write checks can be awaited with
// `wait_post_write_checks()`; everything stops on `shutdown()`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::model::{AlarmEventType, Attribution, HistoryEvent};
use crate::session::Session;

const EVENT_CHANNEL_SIZE: usize = 16;

/// Pick the most recent alarm event and attribute it.
///
/// Non-alarm events are ignored even if the server did not filter them.
/// Events are ordered newest first by parsed timestamp; ties keep feed order
/// and unparseable timestamps sort oldest. Returns `None` when there is no
/// alarm event or the newest one carries no user.
pub fn latest_alarm_action(events: &[HistoryEvent]) -> Option<Attribution> {
    let mut alarm_events: Vec<(&HistoryEvent, AlarmEventType)> = events
        .iter()
        .filter_map(|e| e.alarm_event_type().map(|t| (e, t)))
        .collect();
    alarm_events.sort_by(|(a, _), (b, _)| b.occurred_at.cmp(&a.occurred_at));

    let (event, event_type) = alarm_events.first()?;
    let actor = event.actor.as_ref()?;
    Some(Attribution {
        actor_name: actor.name.clone(),
        actor_id: actor.id.clone(),
        timestamp: event.timestamp.clone(),
        occurred_at: event.occurred_at,
        event_type: *event_type,
    })
}

/// Tracks the most recent attributed alarm change for one site.
#[derive(Clone)]
pub struct HistoryAttributor {
    inner: Arc<AttributorInner>,
}

struct AttributorInner {
    session: Session,
    site_id: String,
    limit: u32,
    last_known: watch::Sender<Option<Attribution>>,
    events: broadcast::Sender<Attribution>,
    cancel: CancellationToken,
    monitors: Mutex<Vec<JoinHandle<()>>>,
    post_writes: Mutex<Vec<JoinHandle<()>>>,
}

impl HistoryAttributor {
    pub fn new(session: Session, site_id: impl Into<String>, limit: u32) -> Self {
        let (last_known, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            inner: Arc::new(AttributorInner {
                session,
                site_id: site_id.into(),
                limit,
                last_known,
                events,
                cancel: CancellationToken::new(),
                monitors: Mutex::new(Vec::new()),
                post_writes: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn site_id(&self) -> &str {
        &self.inner.site_id
    }

    /// Query the history feed and attribute the latest alarm change.
    pub async fn last_alarm_action(&self) -> Option<Attribution> {
        let inner = &self.inner;
        match inner
            .session
            .history(&inner.site_id, inner.limit, &AlarmEventType::ALL)
            .await
        {
            Ok(events) => latest_alarm_action(&events),
            Err(e) => {
                debug!(error = %e, "failed to read alarm history");
                None
            }
        }
    }

    /// One monitoring step. Returns the attribution when its timestamp
    /// differs from the last one seen.
    pub async fn poll_once(&self) -> Option<Attribution> {
        let attribution = self.last_alarm_action().await?;

        let changed = self.inner.last_known.send_if_modified(|known| {
            let same = known
                .as_ref()
                .is_some_and(|k| k.timestamp == attribution.timestamp);
            if !same {
                *known = Some(attribution.clone());
            }
            !same
        });
        if !changed {
            return None;
        }

        if let Some(ref name) = attribution.actor_name {
            info!(
                "Alarm state changed by user: {name} at {}",
                attribution.timestamp
            );
        }
        let _ = self.inner.events.send(attribution.clone());
        Some(attribution)
    }

    /// Start the periodic monitoring loop. The first poll happens one
    /// `period` after the call.
    pub async fn start_monitoring(&self, period: Duration) {
        let handle = tokio::spawn(monitor_task(
            self.clone(),
            period,
            self.inner.cancel.clone(),
        ));
        track(&self.inner.monitors, handle).await;
        debug!(?period, "history monitoring started");
    }

    /// Log the attribution of a just-accepted write after `delay`.
    pub async fn schedule_post_write_check(&self, delay: Duration) {
        let handle = tokio::spawn(post_write_task(
            self.clone(),
            delay,
            self.inner.cancel.clone(),
        ));
        track(&self.inner.post_writes, handle).await;
    }

    /// Wait for every scheduled post-write check to run to completion.
    /// Monitoring is left running.
    pub async fn wait_post_write_checks(&self) {
        let pending: Vec<_> = self.inner.post_writes.lock().await.drain(..).collect();
        for handle in pending {
            let _ = handle.await;
        }
    }

    /// The last attribution seen by the monitoring loop.
    pub fn last_known(&self) -> Option<Attribution> {
        self.inner.last_known.borrow().clone()
    }

    /// Watch the last-known attribution.
    pub fn watch(&self) -> watch::Receiver<Option<Attribution>> {
        self.inner.last_known.subscribe()
    }

    /// Receive every newly observed attribution.
    pub fn subscribe(&self) -> broadcast::Receiver<Attribution> {
        self.inner.events.subscribe()
    }

    /// Stop all background work and wait for it to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        for tasks in [&self.inner.monitors, &self.inner.post_writes] {
            let pending: Vec<_> = tasks.lock().await.drain(..).collect();
            for handle in pending {
                let _ = handle.await;
            }
        }
        debug!("history attributor stopped");
    }
}

async fn track(tasks: &Mutex<Vec<JoinHandle<()>>>, handle: JoinHandle<()>) {
    let mut tasks = tasks.lock().await;
    tasks.retain(|h| !h.is_finished());
    tasks.push(handle);
}

// ── Background tasks ─────────────────────────────────────────────────

async fn monitor_task(attributor: HistoryAttributor, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("history monitor tick");
                attributor.poll_once().await;
            }
        }
    }
}

async fn post_write_task(attributor: HistoryAttributor, delay: Duration, cancel: CancellationToken) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        () = tokio::time::sleep(delay) => {}
    }

    let Some(attribution) = attributor.last_alarm_action().await else {
        return;
    };
    if let Some(ref name) = attribution.actor_name {
        info!("Action performed by user: {name}");
    }
}
