//! Unified error type for fallible logger operations.
//!
//! Emitting a record never returns one of these; per-handler failures during dispatch are
//! collected in a [`crate::Dispatch`] instead.

use crate::config::ValidationError;
use crate::output::{HandlerError, HandlerKind};

/// A reconfiguration request that can't be honoured. State is left unchanged.
#[derive(Debug)]
pub enum UsageError {
    /// A handler of this kind is already present; remove it first.
    AlreadyPresent(HandlerKind),
    /// No handler of this kind is present.
    NotPresent(HandlerKind),
    /// A runtime setter got a value its validator rejects.
    Invalid(ValidationError),
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyPresent(kind) => write!(f, "{kind} handler already present"),
            Self::NotPresent(kind) => write!(f, "no {kind} handler present"),
            Self::Invalid(e) => write!(f, "invalid value: {e}"),
        }
    }
}

impl std::error::Error for UsageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::AlreadyPresent(_) | Self::NotPresent(_) => None,
        }
    }
}

/// Error type for magiklog operations.
#[derive(Debug)]
pub enum Error {
    /// Bad configuration; construction aborted before any handler existed.
    Validation(ValidationError),
    /// A sink could not be created or released.
    Handler(HandlerError),
    /// Invalid reconfiguration request.
    Usage(UsageError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "validation error: {e}"),
            Self::Handler(e) => write!(f, "handler error: {e}"),
            Self::Usage(e) => write!(f, "usage error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Handler(e) => Some(e),
            Self::Usage(e) => Some(e),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<HandlerError> for Error {
    fn from(e: HandlerError) -> Self {
        Self::Handler(e)
    }
}

impl From<UsageError> for Error {
    fn from(e: UsageError) -> Self {
        Self::Usage(e)
    }
}
