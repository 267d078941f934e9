//! Core types and constants shared by both nodes of the Deadbolt unit.
//!
//! Deadbolt is a two-node access-control system: a front **panel** (keypad +
//! display) collects and validates passcodes, and a secure **keeper**
//! (persistent store + door motor + alarm) holds the one authoritative
//! credential copy and decides access. The nodes talk over a half-duplex
//! serial link using the fixed control bytes defined in [`constants`].
//!
//! This crate carries everything both sides must agree on by construction:
//! the credential shape ([`Passcode`], [`Candidate`]), the wire control
//! codes, and the verdict/action vocabulary ([`Verdict`], [`PanelAction`]).

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
