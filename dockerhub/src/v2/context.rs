//! Request contexts.
//!
//! A [`Context`] bounds a registry call: the in-flight request is dropped as
//! soon as the context is canceled or its deadline passes, and the call fails
//! with [`RequestError::Canceled`] or [`RequestError::DeadlineExceeded`].

use crate::errors::RequestError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation signal plus optional deadline for a request.
///
/// Clones share the same cancellation signal.
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Return a context which is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child context expiring after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a child context expiring at `deadline`.
    ///
    /// The parent deadline still applies when it is earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child context, canceled together with this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and all contexts derived from it.
    pub fn cancel(&self) {
        self.token.cancel()
    }

    /// Whether this context has been canceled.
    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Return the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `fut` to completion unless the context ends first.
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, RequestError>
    where
        F: Future<Output = Result<T, RequestError>>,
    {
        if self.is_canceled() {
            return Err(RequestError::Canceled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(RequestError::DeadlineExceeded);
            }
        }

        let expiry = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(RequestError::Canceled),
            _ = expiry => Err(RequestError::DeadlineExceeded),
            res = fut => res,
        }
    }
}

impl From<CancellationToken> for Context {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }
}
