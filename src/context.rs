//! Call context
//!
//! Every adapter call takes a [`Context`] carrying a cancellation token and
//! an optional deadline. Cancelling a parent cancels all of its children.

use crate::error::{CancelCause, Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Child context that shares cancellation with `self`
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Child context with a deadline; an earlier parent deadline wins
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Why this context is done, if it is
    pub fn err(&self) -> Option<Error> {
        if self.token.is_cancelled() {
            return Some(Error::Cancelled(CancelCause::Canceled));
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Some(Error::Cancelled(CancelCause::DeadlineExceeded))
            }
            _ => None,
        }
    }

    pub fn check(&self) -> Result<()> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Drive `fut` until it completes or the context is done
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;
        let deadline = self.deadline;
        tokio::select! {
            res = fut => res,
            _ = self.token.cancelled() => Err(Error::Cancelled(CancelCause::Canceled)),
            _ = sleep_until_deadline(deadline) => {
                Err(Error::Cancelled(CancelCause::DeadlineExceeded))
            }
        }
    }

    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
