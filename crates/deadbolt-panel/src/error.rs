use thiserror::Error;

/// Errors that can occur while running the panel node.
#[derive(Debug, Error)]
pub enum PanelError {
    /// A peripheral failed (keypad or link gone).
    #[error("Hardware fault: {0}")]
    Hardware(#[from] deadbolt_hardware::HardwareError),

    /// A protocol exchange failed.
    #[error("Protocol failure: {0}")]
    Protocol(#[from] deadbolt_protocol::ProtocolError),

    /// A lifecycle state machine was driven out of order.
    #[error("Lifecycle fault: {0}")]
    Lifecycle(#[from] deadbolt_core::Error),
}
