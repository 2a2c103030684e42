mod adhoc;
mod backend_execution_failure;
mod invalid_connection_url;
mod invalid_entity_definition;
mod transaction_already_active;
mod type_conversion;
mod unsupported_feature;
mod unsupported_predicate;

use adhoc::AdhocError;
use backend_execution_failure::BackendExecutionFailure;
use invalid_connection_url::InvalidConnectionUrl;
use invalid_entity_definition::{InvalidEntityDefinition, NoDefaultConstructor};
use std::sync::Arc;
use transaction_already_active::TransactionAlreadyActive;
use type_conversion::TypeConversionError;
use unsupported_feature::UnsupportedFeature;
use unsupported_predicate::UnsupportedPredicate;

/// Returns early with an ad-hoc [`Error`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc [`Error`] from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Keel.
///
/// Errors are one pointer wide and cheap to clone. A chain of context can be
/// attached with [`Error::context`]; `Display` prints the chain outermost
/// first, separated by `": "`.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// The most recently added context is displayed first, followed by
    /// earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner.map(Arc::try_unwrap) {
            Some(Ok(ErrorInner { kind, cause: None })) => kind,
            Some(Ok(inner)) => ErrorKind::Adhoc(AdhocError::new(
                Error {
                    inner: Some(Arc::new(inner)),
                }
                .to_string(),
            )),
            Some(Err(shared)) => ErrorKind::Adhoc(AdhocError::new(
                Error {
                    inner: Some(shared),
                }
                .to_string(),
            )),
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Returns true if any error in the chain satisfies `f`.
    fn any(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::BackendExecutionFailure(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    BackendExecutionFailure(BackendExecutionFailure),
    InvalidConnectionUrl(InvalidConnectionUrl),
    InvalidEntityDefinition(InvalidEntityDefinition),
    NoDefaultConstructor(NoDefaultConstructor),
    TransactionAlreadyActive(TransactionAlreadyActive),
    TypeConversion(TypeConversionError),
    UnsupportedFeature(UnsupportedFeature),
    UnsupportedPredicate(UnsupportedPredicate),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            BackendExecutionFailure(err) => core::fmt::Display::fmt(err, f),
            InvalidConnectionUrl(err) => core::fmt::Display::fmt(err, f),
            InvalidEntityDefinition(err) => core::fmt::Display::fmt(err, f),
            NoDefaultConstructor(err) => core::fmt::Display::fmt(err, f),
            TransactionAlreadyActive(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            UnsupportedPredicate(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown keel error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

impl IntoError for String {
    fn into_error(self) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(self)))
    }
}

impl IntoError for &str {
    fn into_error(self) -> Error {
        self.to_string().into_error()
    }
}
