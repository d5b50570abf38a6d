//! # Errors
//!
//! This module defines the error types used by the crate, including for
//! resolver backends implemented in other crates.
//!
//! Every failure carries an [`Err`] code as its root cause. Callers can test
//! for a specific code with [`Error::is`] regardless of how much context was
//! layered on top.

use std::fmt::Display;

use thiserror::Error;

/// Return an error code decorated with a formatted message.
///
/// The failure is traced at debug level so request flows can be followed
/// without the library emitting error-level output on behalf of the caller.
///
/// # Example
/// ```
/// use cardano_handle::error::Err;
/// use cardano_handle::{tracerr, Result};
///
/// fn with_msg() -> Result<()> {
///     tracerr!(Err::NotFound, "handle {} not found", "abc")
/// }
///
/// fn no_msg() -> Result<()> {
///     tracerr!(Err::NotFound)
/// }
/// ```
#[macro_export]
macro_rules! tracerr {
    // with context
    ($code:expr, $($msg:tt)*) => {
        {
        use $crate::error::Context as _;
        $crate::tracing::debug!($($msg)*);
        return Err($code).context(format!($($msg)*));
        }
    };
    // no context
    ($code:expr) => {
        {
        $crate::tracing::debug!("{}", $code);
        return Err($code.into());
        }
    }
}

/// Public error type.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(#[from] anyhow::Error);

impl Error {
    /// Render the error as a JSON object of the form
    /// `{"error": <code>, "error_description": <message>}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.0.root_cause().to_string(),
            "error_description": self.to_string(),
        })
    }

    /// Returns true if `err` is the error code at the root of this error.
    #[must_use]
    pub fn is(&self, err: Err) -> bool {
        self.0.root_cause().downcast_ref::<Err>().is_some_and(|e| e == &err)
    }

    /// The error code at the root of this error, if there is one.
    #[must_use]
    pub fn code(&self) -> Option<Err> {
        self.0.root_cause().downcast_ref::<Err>().copied()
    }
}

/// Typed error codes.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum Err {
    /// The environment name is not one of the supported networks.
    #[error("invalid_environment")]
    InvalidEnvironment,

    /// The project id does not start with a known network prefix, so no
    /// indexer base URL can be derived from it.
    #[error("unrecognized_environment")]
    UnrecognizedEnvironment,

    /// Client configuration could not be applied (bad base URL, header value,
    /// HTTP client construction).
    #[error("invalid_config")]
    InvalidConfig,

    /// Request failed to connect, timed out or the body could not be read.
    #[error("request_error")]
    RequestError,

    /// The indexer answered with a non-success status.
    #[error("api_error")]
    ApiError,

    /// A response body did not match the expected JSON shape.
    #[error("deserialization_error")]
    DeserializationError,

    /// No address holds the requested asset or the handle is unknown.
    #[error("not_found")]
    NotFound,

    /// More than one address holds an asset expected to be unique.
    #[error("multiple_owners")]
    MultipleOwners,

    /// An asset name is not valid hex or does not decode to UTF-8.
    #[error("invalid_asset_name")]
    InvalidAssetName,

    /// The address prefix is neither `stake` nor `addr`.
    #[error("unrecognized_address")]
    UnrecognizedAddress,

    /// A policy id does not belong to the environment being served.
    #[error("wrong_policy")]
    WrongPolicy,
}

/// Context is used to decorate errors with useful context information.
pub trait Context<T, E> {
    /// Adds context to the error.
    ///
    /// # Errors
    ///
    /// * Original error with context appended.
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T, E> for core::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(Error(anyhow::Error::from(e).context(context))),
        }
    }
}

impl Error {
    /// Wrap this error with an additional message, keeping the root code.
    #[must_use]
    pub fn wrap<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static,
    {
        Self(self.0.context(context))
    }
}

impl From<Err> for Error {
    fn from(error: Err) -> Self {
        Self(error.into())
    }
}
