//! # Chat router
//!
//! Owns an ordered chain of [`ChatHandler`]s and dispatches each [`ChatEvent`] through it.
//! Registration order is priority. Under [`DispatchPolicy::FirstMatch`] the first handler that
//! responds ends the dispatch; under [`DispatchPolicy::All`] every handler runs and responses
//! are yielded in registration order. A failing handler is reported to the [`FailureSink`] and
//! skipped; it never aborts the dispatch.

mod config;
mod dedup;
mod dispatch;
mod registry;

pub use config::{DispatchPolicy, DuplicatePolicy, RouterConfig, DEFAULT_DEDUP_WINDOW};
pub use dispatch::ResponseStream;
pub use registry::{HandlerDescription, HandlerHandle, RegistryView};

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use nonobot_core::{
    ChatEvent, ChatHandler, ChatResponse, FailureSink, RouterError, TracingFailureSink,
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn};

use dedup::SeenEvents;
use dispatch::DispatchContext;
use registry::{describe, Insert, Registry};

/// Cheap to clone; clones share the registry, the failure sink, and the dedup window.
#[derive(Clone)]
pub struct ChatRouter {
    registry: Arc<Registry>,
    config: Arc<RouterConfig>,
    sink: Arc<dyn FailureSink>,
    seen: Arc<Mutex<SeenEvents>>,
}

impl std::fmt::Debug for ChatRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRouter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatRouter {
    /// Creates an empty router reporting failures to [`TracingFailureSink`].
    pub fn new(config: RouterConfig) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            seen: Arc::new(Mutex::new(SeenEvents::new(config.dedup_window))),
            config: Arc::new(config),
            sink: Arc::new(TracingFailureSink),
        }
    }

    /// Replaces the failure sink (observability collaborator).
    pub fn with_failure_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Appends a handler. A handler whose id is already registered is ignored (existing handle
    /// returned) or rejected, depending on [`DuplicatePolicy`].
    pub fn register(&self, handler: Arc<dyn ChatHandler>) -> Result<HandlerHandle, RouterError> {
        let id = handler.id().to_string();
        match self.registry.insert(handler) {
            Insert::Added(handle) => {
                info!(handler = %id, handle = %handle, "Handler registered");
                Ok(handle)
            }
            Insert::Existing(handle) => match self.config.duplicate_policy {
                DuplicatePolicy::Ignore => {
                    debug!(handler = %id, handle = %handle, "Handler already registered, ignored");
                    Ok(handle)
                }
                DuplicatePolicy::Reject => {
                    warn!(handler = %id, "Duplicate handler rejected");
                    Err(RouterError::DuplicateHandler(id))
                }
            },
        }
    }

    /// Removes a handler. Returns false (no-op) if the handle is not registered.
    /// Dispatches already in flight keep using the chain they started with.
    pub fn unregister(&self, handle: HandlerHandle) -> bool {
        match self.registry.remove(handle) {
            Some(handler) => {
                info!(handler = %handler.id(), handle = %handle, "Handler unregistered");
                true
            }
            None => false,
        }
    }

    /// Moves a handler to position `index` (clamped). Returns false if the handle is not registered.
    pub fn move_to(&self, handle: HandlerHandle, index: usize) -> bool {
        self.registry.move_to(handle, index)
    }

    pub fn len(&self) -> usize {
        self.registry.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the registered handlers, in dispatch order.
    pub fn handler_ids(&self) -> Vec<String> {
        self.registry
            .snapshot()
            .iter()
            .map(|e| e.handler.id().to_string())
            .collect()
    }

    pub fn handler_descriptions(&self) -> Vec<HandlerDescription> {
        describe(&self.registry.snapshot())
    }

    /// Weak, read-only view of the registry for handlers that list their siblings.
    pub fn registry(&self) -> RegistryView {
        RegistryView::new(&self.registry)
    }

    /// Dispatches `event` through the current handler chain. See [`ChatRouter::dispatch_with_cancel`].
    pub fn dispatch(&self, event: ChatEvent) -> ResponseStream {
        self.dispatch_with_cancel(event, CancellationToken::new())
    }

    /// Dispatches `event` and returns its responses as a lazy stream. The chain is snapshotted
    /// now; handlers run as the stream is polled. Once `cancel` fires the stream ends and
    /// in-flight handler futures are dropped. A redelivered event id yields an empty stream.
    /// Handlers run inside a `dispatch` span carrying the event id and policy.
    pub fn dispatch_with_cancel(&self, event: ChatEvent, cancel: CancellationToken) -> ResponseStream {
        let span = info_span!("dispatch", event_id = %event.id, policy = %self.config.policy);
        let _entered = span.enter();

        if !self.seen.lock().first_delivery(&event.id) {
            debug!(event_id = %event.id, "step: redelivered event dropped");
            return Box::pin(stream::empty());
        }

        let snapshot = self.registry.snapshot();
        info!(
            event_id = %event.id,
            sender = %event.sender,
            channel = %event.channel,
            handlers = snapshot.len(),
            "step: dispatch started"
        );

        let event = Arc::new(event);
        let ctx = Arc::new(DispatchContext {
            timeout: self.config.handler_timeout,
            sink: self.sink.clone(),
            span: span.clone(),
        });

        let responses = match self.config.policy {
            DispatchPolicy::FirstMatch => dispatch::first_match(snapshot, event, ctx).boxed(),
            DispatchPolicy::All => dispatch::all(snapshot, event, ctx).boxed(),
        };
        Box::pin(responses.take_until(cancel.cancelled_owned()))
    }

    /// Dispatches and collects every response.
    pub async fn dispatch_collect(&self, event: ChatEvent) -> Vec<ChatResponse> {
        self.dispatch(event).collect().await
    }
}

impl Default for ChatRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

// Integration tests live in tests/chat_router_test.rs
