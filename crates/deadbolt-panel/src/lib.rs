//! The front panel node: keypad entry, passcode lifecycle, and the
//! operator-facing half of the verification conversation.
//!
//! The panel drives the conversation: it collects and validates passcode
//! input, transfers it to the keeper over the serial handshake, and after
//! a granted verification either asks the keeper to run the door
//! timeline or hands over a replacement passcode. The panel never holds
//! the authoritative credential; its working copy lives only for the
//! duration of one lifecycle operation.
//!
//! Module layout:
//!
//! - [`entry`]: bounded keypad reading, the exact `PASS_SIZE + enter`
//!   discipline for first entries and the terminator-aware bounded read
//!   used for confirmation and verification.
//! - [`lifecycle`]: the provisioning state machine
//!   (`EnterFirst → Confirm → Done`).
//! - [`panel`]: the node itself (options menu, verification rounds, and
//!   the local door/lockout display timelines.

pub mod entry;
pub mod error;
pub mod lifecycle;
pub mod panel;

pub use entry::{ExactEntry, PasscodeEntry};
pub use error::PanelError;
pub use lifecycle::{ProvisionMachine, ProvisionState};
pub use panel::{Panel, PanelConfig, SessionOutcome};
