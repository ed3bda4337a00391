use crate::cloud_provider;
use act_zero::ActorError;
use std::fmt;
use tracing::error;
use tracing_error::SpanTrace;

/// Error returned from actor methods, carrying the span it was raised in.
#[derive(Debug, thiserror::Error)]
pub struct Error {
    source: ErrorKind,
    span_trace: SpanTrace,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Stops the actor.
    #[error(transparent)]
    Fatal(anyhow::Error),
    #[error(transparent)]
    NonFatal(#[from] anyhow::Error),
}

impl Error {
    pub fn fatal(source: impl Into<anyhow::Error>) -> Self {
        Self {
            source: ErrorKind::Fatal(source.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.source
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, fmt)
    }
}

impl From<cloud_provider::Error> for ErrorKind {
    fn from(source: cloud_provider::Error) -> Self {
        use cloud_provider::Error::*;

        match source {
            MissingToken | ClusterIdUnresolved { .. } | InvalidConfig(_) | Io(_) => {
                ErrorKind::Fatal(source.into())
            }
            _ => ErrorKind::NonFatal(source.into()),
        }
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(source: E) -> Self {
        Self {
            source: ErrorKind::from(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

/// Logs an actor error and returns whether the actor has to stop.
pub fn handle_error(error: ActorError) -> bool {
    let (error, stop_actor, span_trace) = match error.downcast_ref::<Error>() {
        Some(e) => (
            format!("{:?}", e.source),
            matches!(&e.source, ErrorKind::Fatal(_)),
            Some(&e.span_trace),
        ),
        None => (format!("{:?}", error), false, None),
    };

    error!(
        %stop_actor,
        "ActorError: {} SpanTrace: {}",
        error,
        span_trace
            .map(|st| format!("{}", st))
            .unwrap_or_else(|| String::from("None"))
    );

    stop_actor
}
