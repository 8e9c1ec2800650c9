//! Per-event execution of a handler snapshot.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesOrdered, Stream, StreamExt};
use futures::FutureExt;
use nonobot_core::{ChatEvent, ChatHandler, ChatResponse, FailureSink, HandlerError, HandlerFailure};
use tracing::{debug, info, Instrument, Span};

use crate::registry::Snapshot;

/// Lazy, finite sequence of responses for one dispatch. Nothing runs until it is polled.
pub type ResponseStream = Pin<Box<dyn Stream<Item = ChatResponse> + Send>>;

/// What every handler invocation of a dispatch shares.
pub(crate) struct DispatchContext {
    pub(crate) timeout: Option<Duration>,
    pub(crate) sink: Arc<dyn FailureSink>,
    /// Dispatch span; every handler invocation runs inside it.
    pub(crate) span: Span,
}

/// Runs one handler; any error, timeout, or panic is reported to the sink and becomes `None`.
async fn invoke(
    handler: Arc<dyn ChatHandler>,
    event: Arc<ChatEvent>,
    ctx: Arc<DispatchContext>,
) -> Option<ChatResponse> {
    debug!(
        handler = %handler.id(),
        event_id = %event.id,
        "step: handler processing"
    );

    let call = AssertUnwindSafe(handler.handle(&event)).catch_unwind();
    let outcome = match ctx.timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => Ok(Err(HandlerError::Timeout(limit.as_millis() as u64))),
        },
        None => call.await,
    };
    let result = outcome.unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload))));

    match result {
        Ok(Some(response)) => {
            info!(
                handler = %handler.id(),
                event_id = %event.id,
                channel = %response.channel,
                reply_len = response.text.len(),
                "step: handler replied"
            );
            Some(response)
        }
        Ok(None) => {
            debug!(handler = %handler.id(), event_id = %event.id, "step: handler skipped");
            None
        }
        Err(error) => {
            ctx.sink.report(HandlerFailure::new(handler.id(), event.id.as_str(), error));
            None
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Handlers one at a time; stops after the first response.
pub(crate) fn first_match(
    snapshot: Snapshot,
    event: Arc<ChatEvent>,
    ctx: Arc<DispatchContext>,
) -> impl Stream<Item = ChatResponse> + Send {
    async_stream::stream! {
        for entry in snapshot.iter() {
            let span = ctx.span.clone();
            if let Some(response) = invoke(entry.handler.clone(), event.clone(), ctx.clone()).instrument(span).await {
                debug!(handler = %entry.handler.id(), event_id = %event.id, "step: first match, chain stopped");
                yield response;
                break;
            }
        }
    }
}

/// Every handler, concurrently; responses come out in registration order.
pub(crate) fn all(
    snapshot: Snapshot,
    event: Arc<ChatEvent>,
    ctx: Arc<DispatchContext>,
) -> impl Stream<Item = ChatResponse> + Send {
    async_stream::stream! {
        let mut pending: FuturesOrdered<_> = snapshot
            .iter()
            .map(|entry| invoke(entry.handler.clone(), event.clone(), ctx.clone()).instrument(ctx.span.clone()))
            .collect();
        while let Some(outcome) = pending.next().await {
            if let Some(response) = outcome {
                yield response;
            }
        }
    }
}
