use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConnectError>;

/// Everything that can stop a connect attempt.
///
/// None of these are fatal. They bubble up to
/// [`ConnectionController::connect_wallet`](crate::controller::ConnectionController::connect_wallet),
/// get logged, and leave the page disconnected so the user can try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("wallet is on chain {actual}, expected chain {expected}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("wallet provider connection failed: {0}")]
    ProviderConnection(String),

    #[error("wallet returned no accounts")]
    NoAccount,

    #[error("reverse name resolution failed: {0}")]
    Resolution(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
