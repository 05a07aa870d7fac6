//! Outcome of one reconciliation step and how steps compose.
//!
//! A reconciliation is an ordered list of steps. The first step that returns
//! anything other than [`Signal::Continue`] ends the attempt with that signal.
//! Running off the end of the list is [`Signal::Stop`].

use crate::config::OperatorConfig;
use crate::error::{Error, Result};
use kube::runtime::controller::Action;
use tracing::debug;

#[derive(Debug)]
pub enum Signal {
    /// Nothing left to do until something changes.
    Stop,
    /// Try again later; not a failure.
    Requeue,
    /// Try again later and report the error.
    RequeueWithError(Error),
    /// Proceed to the next step.
    Continue,
}

impl Signal {
    pub fn is_continue(&self) -> bool {
        matches!(self, Signal::Continue)
    }

    /// Whether the watch loop should schedule another attempt.
    pub fn is_retry(&self) -> bool {
        matches!(self, Signal::Requeue | Signal::RequeueWithError(_))
    }

    /// Collapses a trailing `Continue` into `Stop`.
    pub fn finish(self) -> Signal {
        match self {
            Signal::Continue => Signal::Stop,
            other => other,
        }
    }

    /// Evaluates steps lazily, stopping at the first non-`Continue`.
    pub fn sequence<I>(steps: I) -> Signal
    where
        I: IntoIterator<Item = Signal>,
    {
        steps
            .into_iter()
            .find(|signal| !signal.is_continue())
            .unwrap_or(Signal::Stop)
    }

    /// Converts to what kube-runtime expects from a reconcile function. An
    /// error goes through the controller's error policy.
    pub fn into_action(self, config: &OperatorConfig) -> Result<Action> {
        match self {
            Signal::Stop | Signal::Continue => Ok(Action::await_change()),
            Signal::Requeue => Ok(Action::requeue(config.requeue_after)),
            Signal::RequeueWithError(err) => Err(err),
        }
    }
}

impl From<Error> for Signal {
    fn from(err: Error) -> Self {
        if err.is_already_exists() {
            // lost a create race; the next attempt sees the object and patches it
            debug!("{}, requeueing", err);
            Signal::Requeue
        } else {
            Signal::RequeueWithError(err)
        }
    }
}

impl<T> From<Result<T>> for Signal {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => Signal::Continue,
            Err(err) => err.into(),
        }
    }
}

/// Runs a step and returns its signal from the enclosing function unless it
/// is `Continue`.
#[macro_export]
macro_rules! proceed {
    ($step:expr) => {
        match $crate::signal::Signal::from($step) {
            $crate::signal::Signal::Continue => {}
            other => return other,
        }
    };
}
