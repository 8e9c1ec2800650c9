//! Event loop joining an [`EventSource`] and a [`ResponsePublisher`] through a [`ChatRouter`].
//!
//! Each event is dispatched on its own task, so a slow handler never delays other events.
//! Each session owns a cancellation token; `SessionClosed` cancels that session's in-flight
//! dispatches. A session entry lives only while it has dispatches in flight. Cancelling the
//! runtime's shutdown token stops the loop and cancels everything.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chat_router::ChatRouter;
use futures::StreamExt;
use nonobot_core::{
    ChatEvent, ChatResponse, EventSource, InboundEvent, ResponsePublisher, SessionId,
    TransportError,
};
use parking_lot::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

type Sessions = Arc<Mutex<HashMap<SessionId, SessionEntry>>>;

struct SessionEntry {
    token: CancellationToken,
    in_flight: usize,
    generation: u64,
}

/// Held by a dispatch task; releases its session slot on drop, removing the entry with the last one.
struct SessionLease {
    sessions: Sessions,
    session: SessionId,
    generation: u64,
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        let mut sessions = self.sessions.lock();
        let Some(entry) = sessions.get_mut(&self.session) else {
            return;
        };
        // A closed and reopened session is a new entry; leave it alone.
        if entry.generation != self.generation {
            return;
        }
        entry.in_flight -= 1;
        if entry.in_flight == 0 {
            sessions.remove(&self.session);
        }
    }
}

#[derive(Clone)]
pub struct BotRuntime {
    router: ChatRouter,
    publisher: Arc<dyn ResponsePublisher>,
    sessions: Sessions,
    next_generation: Arc<AtomicU64>,
    shutdown: CancellationToken,
}

impl BotRuntime {
    pub fn new(router: ChatRouter, publisher: Arc<dyn ResponsePublisher>) -> Self {
        Self {
            router,
            publisher,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(0)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn router(&self) -> &ChatRouter {
        &self.router
    }

    /// Token that stops [`BotRuntime::run`] when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Publishes an unsolicited message (not a reply to any event).
    pub async fn send_message(&self, channel: &str, text: &str) -> Result<(), TransportError> {
        let response = ChatResponse::new(channel, text);
        info!(channel = %channel, text_len = text.len(), "Sending message");
        self.publisher.publish(&response).await
    }

    /// Cancels in-flight dispatches of `session`. Returns false if the session had none.
    pub fn close_session(&self, session: &str) -> bool {
        match self.sessions.lock().remove(session) {
            Some(entry) => {
                entry.token.cancel();
                info!(session = %session, "Session closed, in-flight dispatches cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of sessions with dispatches in flight.
    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    fn lease_session(&self, session: &str) -> (CancellationToken, SessionLease) {
        let mut sessions = self.sessions.lock();
        let entry = sessions
            .entry(session.to_string())
            .or_insert_with(|| SessionEntry {
                token: self.shutdown.child_token(),
                in_flight: 0,
                generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
            });
        entry.in_flight += 1;
        let lease = SessionLease {
            sessions: self.sessions.clone(),
            session: session.to_string(),
            generation: entry.generation,
        };
        (entry.token.clone(), lease)
    }

    /// Pulls events until the source is exhausted or shutdown is requested, then waits for
    /// in-flight dispatches to finish.
    #[instrument(skip(self, source))]
    pub async fn run<S: EventSource>(&self, mut source: S) -> Result<()> {
        let mut tasks = JoinSet::new();
        info!("step: runtime started");

        loop {
            let next = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("step: shutdown requested");
                    break;
                }
                next = source.next() => next,
            };

            match next {
                Some(InboundEvent::Message(event)) => {
                    let (cancel, lease) = self.lease_session(&event.session);
                    let router = self.router.clone();
                    let publisher = self.publisher.clone();
                    tasks.spawn(async move {
                        let _lease = lease;
                        process_event(router, publisher, event, cancel).await
                    });
                }
                Some(InboundEvent::SessionClosed(session)) => {
                    self.close_session(&session);
                }
                None => {
                    info!("step: event source exhausted");
                    break;
                }
            }

            while let Some(joined) = tasks.try_join_next() {
                log_join(joined);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }
        info!("step: runtime stopped");
        Ok(())
    }
}

fn log_join(joined: std::result::Result<usize, tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Dispatch task failed");
    }
}

/// Dispatches one event and publishes its responses. Returns the number published.
async fn process_event(
    router: ChatRouter,
    publisher: Arc<dyn ResponsePublisher>,
    event: ChatEvent,
    cancel: CancellationToken,
) -> usize {
    let event_id = event.id.clone();
    let session = event.session.clone();
    debug!(event_id = %event_id, session = %session, "step: processing event");

    let mut responses = router.dispatch_with_cancel(event, cancel.clone());
    let mut published = 0;
    while let Some(response) = responses.next().await {
        match publisher.publish(&response).await {
            Ok(()) => published += 1,
            Err(e) => error!(
                event_id = %event_id,
                channel = %response.channel,
                error = %e,
                "Failed to publish response"
            ),
        }
    }

    if cancel.is_cancelled() {
        warn!(event_id = %event_id, session = %session, "Dispatch cancelled");
    }
    debug!(event_id = %event_id, published, "step: event processed");
    published
}
