// src/internal/instrument/mod.rs

//! Opt-in failure interception for methods.
//!
//! A method is instrumented by running its body through [`Instrumentation::call`]
//! (or by capturing it once with [`wrap`]). Errors and panics raised by the body
//! become a single ERROR record on the receiver's logger; under the default
//! [`FailurePolicy::Suppress`] the caller then sees `Ok(None)` instead of the
//! failure. Nothing is intercepted implicitly.

pub mod owner;

use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe, Location};

use serde::{Deserialize, Serialize};

use crate::internal::logger::level;
use crate::internal::logger::{CallSite, Logger, Logging};

pub use owner::{short_type_name, LogOwner};

/// What an instrumented call does with a failure after logging it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log and return `Ok(None)`.
    #[default]
    Suppress,
    /// Log and return the failure to the caller.
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{owner}.{method} failed: {message}")]
pub struct InstrumentedMethodFailure {
    pub owner: String,
    pub method: String,
    pub message: String,
    /// True when the body panicked rather than returning `Err`.
    pub panicked: bool,
}

#[derive(Debug, Clone)]
pub struct Instrumentation {
    root: Logger,
    policy: FailurePolicy,
}

impl Instrumentation {
    /// `root` receives failure records for receivers without a logger.
    pub fn new(root: Logger, policy: FailurePolicy) -> Self {
        Self { root, policy }
    }

    pub fn from_logging(logging: &Logging, policy: FailurePolicy) -> Self {
        Self::new(logging.root(), policy)
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Runs `body` as method `method` of `receiver`.
    ///
    /// Success yields `Ok(Some(value))`. An `Err` or a panic is logged once at
    /// ERROR and then handled per the policy. The record is attributed to the
    /// line that called `call`, as `Owner.method`. A panic still reaches the
    /// process panic hook before it is caught.
    #[track_caller]
    pub fn call<R, T, E, F>(
        &self,
        receiver: &R,
        method: &str,
        body: F,
    ) -> Result<Option<T>, InstrumentedMethodFailure>
    where
        R: LogOwner + ?Sized,
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.run(receiver, method, Location::caller(), body)
    }

    /// [`call`](Self::call) for bodies whose only failure mode is a panic.
    #[track_caller]
    pub fn call_infallible<R, T, F>(
        &self,
        receiver: &R,
        method: &str,
        body: F,
    ) -> Result<Option<T>, InstrumentedMethodFailure>
    where
        R: LogOwner + ?Sized,
        F: FnOnce() -> T,
    {
        self.run(receiver, method, Location::caller(), || {
            Ok::<T, std::convert::Infallible>(body())
        })
    }

    fn run<R, T, E, F>(
        &self,
        receiver: &R,
        method: &str,
        location: &Location<'_>,
        body: F,
    ) -> Result<Option<T>, InstrumentedMethodFailure>
    where
        R: LogOwner + ?Sized,
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        let (message, panicked) = match panic::catch_unwind(AssertUnwindSafe(body)) {
            Ok(Ok(value)) => return Ok(Some(value)),
            Ok(Err(e)) => (e.to_string(), false),
            Err(payload) => (panic_message(payload.as_ref()), true),
        };

        let owner = receiver.owner_name();
        let call_site = CallSite::from_location(location)
            .with_function(method)
            .with_owner(owner.clone());
        let logger = receiver.logger().unwrap_or(&self.root);
        logger.log_at(
            &level::ERROR,
            format!("Exception occured:\n\t{}", message),
            call_site,
        );

        match self.policy {
            FailurePolicy::Suppress => Ok(None),
            FailurePolicy::Propagate => Err(InstrumentedMethodFailure {
                owner,
                method: method.to_string(),
                message,
                panicked,
            }),
        }
    }
}

/// Captures `method` once and returns an instrumented version of it.
///
/// The returned closure takes the receiver and the method's argument and runs
/// the captured callable through the same path as [`Instrumentation::call`].
/// Failures are attributed to the line that called `wrap`.
#[track_caller]
pub fn wrap<R, A, T, E, F>(
    instrumentation: Instrumentation,
    name: &str,
    method: F,
) -> impl Fn(&R, A) -> Result<Option<T>, InstrumentedMethodFailure>
where
    R: LogOwner,
    E: Display,
    F: Fn(&R, A) -> Result<T, E>,
{
    let defined_at = Location::caller();
    let name = name.to_string();
    move |receiver: &R, arg: A| {
        instrumentation.run(receiver, &name, defined_at, || method(receiver, arg))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
