//! Console transport: each stdin line is a message on channel `console`; responses go to stdout.

use async_trait::async_trait;
use nonobot_core::{
    BotIdentity, ChatEvent, ChatResponse, EventSource, InboundEvent, ResponsePublisher,
    TransportError,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tokio::sync::Mutex;
use tracing::warn;

pub const CONSOLE_CHANNEL: &str = "console";
pub const CONSOLE_SENDER: &str = "console";

/// Reads lines and turns them into events. Blank lines are skipped; a read error or EOF ends the source.
pub struct ConsoleSource<R> {
    lines: Lines<R>,
    identity: BotIdentity,
}

impl ConsoleSource<BufReader<Stdin>> {
    pub fn stdin(identity: BotIdentity) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), identity)
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleSource<R> {
    pub fn new(reader: R, identity: BotIdentity) -> Self {
        Self {
            lines: reader.lines(),
            identity,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for ConsoleSource<R> {
    async fn next(&mut self) -> Option<InboundEvent> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    let event = ChatEvent::inbound(&self.identity, CONSOLE_SENDER, CONSOLE_CHANNEL, &line)
                        .with_session(CONSOLE_CHANNEL);
                    return Some(InboundEvent::Message(event));
                }
                Ok(None) => return None,
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    return None;
                }
            }
        }
    }
}

/// Writes each response on its own line, prefixed with the bot name.
pub struct ConsolePublisher<W> {
    writer: Mutex<W>,
    name: String,
}

impl ConsolePublisher<Stdout> {
    pub fn stdout(identity: &BotIdentity) -> Self {
        Self::new(tokio::io::stdout(), identity)
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsolePublisher<W> {
    pub fn new(writer: W, identity: &BotIdentity) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: identity.name.clone(),
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> ResponsePublisher for ConsolePublisher<W> {
    async fn publish(&self, response: &ChatResponse) -> Result<(), TransportError> {
        let line = format!("{}> {}\n", self.name, response.text);
        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))
    }
}
