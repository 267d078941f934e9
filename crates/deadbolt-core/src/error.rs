use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid digit code: {0:#04x}")]
    InvalidDigit(u8),

    #[error("Invalid passcode literal: {0}")]
    InvalidPasscodeLiteral(String),

    // Protocol errors
    #[error("Invalid verdict byte: {0:#04x}")]
    InvalidVerdict(u8),

    #[error("Invalid action byte: {0:#04x}")]
    InvalidAction(u8),

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, Error>;
