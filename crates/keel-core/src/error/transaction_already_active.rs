use super::Error;

/// Error when a transaction is started while another one is still open on
/// the same database handle.
#[derive(Debug)]
pub(super) struct TransactionAlreadyActive;

impl std::error::Error for TransactionAlreadyActive {}

impl core::fmt::Display for TransactionAlreadyActive {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("a transaction is already active; nested transactions are not supported")
    }
}

impl Error {
    pub fn transaction_already_active() -> Error {
        Error::from(super::ErrorKind::TransactionAlreadyActive(
            TransactionAlreadyActive,
        ))
    }

    pub fn is_transaction_already_active(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TransactionAlreadyActive(_))
    }
}
