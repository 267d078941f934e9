use thiserror::Error;

/// Errors that can occur while running a protocol exchange.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying serial link failed (peer endpoint gone).
    #[error("Link fault: {0}")]
    Link(#[from] deadbolt_hardware::HardwareError),

    /// The peer sent a byte the protocol does not allow at this point.
    #[error("Protocol violation: {0}")]
    Violation(#[from] deadbolt_core::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
