use thiserror::Error;

#[derive(Error, Debug)]
pub enum NonobotError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by a handler's `create` when a property is absent or unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required property: {0}")]
    MissingProperty(String),

    #[error("Invalid value for property {name}: {reason}")]
    InvalidProperty { name: String, reason: String },
}

/// Raised while a handler processes an event. Caught by the router, never propagated to the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Handler timed out after {0} ms")]
    Timeout(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Handler panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Handler already registered: {0}")]
    DuplicateHandler(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Transport closed")]
    Closed,

    #[error("Publish failed: {0}")]
    Publish(String),
}

pub type Result<T> = std::result::Result<T, NonobotError>;
