//! The secure keeper node: the authoritative credential copy, the
//! verification & lockout machine, and the physical actuators.
//!
//! The keeper never initiates anything. It persists the passcode the panel
//! provisions, then serves verification sessions: receive a candidate,
//! compare it against the persistent store, answer with a verdict, and on
//! a grant execute whatever the panel asks: run the door timeline or
//! accept a replacement passcode. Three consecutive denies end the session
//! in lockout: the alarm timeline runs instead of another round.
//!
//! Module layout:
//!
//! - [`vault`]: credential persistence over the addressed byte store.
//! - [`verify`]: the consecutive-deny tracker behind the lockout rule.
//! - [`keeper`]: the node itself (session loop and actuation timelines).

pub mod error;
pub mod keeper;
pub mod vault;
pub mod verify;

pub use error::KeeperError;
pub use keeper::{Keeper, KeeperConfig, ServeOutcome};
pub use vault::CredentialVault;
pub use verify::LockoutTracker;
