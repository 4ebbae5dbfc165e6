use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickLensError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tick {0} is outside the representable tick range")]
    TickOutOfBounds(i32),

    #[error("Packed tick blob must be {expected} bytes, got {actual}")]
    InvalidBlobLength { expected: usize, actual: usize },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("ABI decoding error for contract call: {0}")]
    AbiDecodeError(String),

    #[error("No tick record held for initialized tick {0}")]
    MissingTickRecord(i32),

    #[error("Configuration error: {0}")]
    Config(String),
}
