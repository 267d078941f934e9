use thiserror::Error;

/// Errors that can occur while running the keeper node.
#[derive(Debug, Error)]
pub enum KeeperError {
    /// A peripheral failed (store or link gone).
    #[error("Hardware fault: {0}")]
    Hardware(#[from] deadbolt_hardware::HardwareError),

    /// A protocol exchange failed.
    #[error("Protocol failure: {0}")]
    Protocol(#[from] deadbolt_protocol::ProtocolError),
}
