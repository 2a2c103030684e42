use super::Error;

/// Error surfaced from a backend driver while executing a statement.
///
/// Covers connection failures, statement preparation and execution,
/// transaction control, and file I/O for file-backed stores. The failing
/// statement is attached by the caller with [`Error::context`].
#[derive(Debug)]
pub(super) struct BackendExecutionFailure {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for BackendExecutionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for BackendExecutionFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "backend execution failed: {}", self.inner)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Wraps an error returned by a driver library (rusqlite, filesystem
    /// I/O, ...).
    pub fn backend_execution_failure(
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::BackendExecutionFailure(
            BackendExecutionFailure {
                inner: Box::new(err),
            },
        ))
    }

    /// Returns `true` if this error, or any error in its cause chain, is a
    /// backend execution failure.
    pub fn is_backend_execution_failure(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::BackendExecutionFailure(_)))
    }
}
