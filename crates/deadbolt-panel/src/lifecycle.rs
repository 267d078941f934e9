//! The provisioning lifecycle state machine.
//!
//! Governs first-time passcode entry and its confirmation:
//!
//! ```text
//! EnterFirst ──accept_first──> Confirm ──confirm (equal)──> Done
//!     ^                          │
//!     └──────confirm (differs)───┘
//! ```
//!
//! A credential is only considered confirmed after two independently
//! entered sequences compare equal element-wise with equal length; any
//! other confirmation outcome loops back to `EnterFirst` and discards the
//! first entry.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use deadbolt_core::{Error, Passcode, Result};

use crate::entry::PasscodeEntry;

/// States of the provisioning lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionState {
    /// Waiting for a well-formed first entry.
    EnterFirst,
    /// First entry held; waiting for the confirmation entry.
    Confirm,
    /// Both entries matched; the passcode has been handed off.
    Done,
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            ProvisionState::EnterFirst => "EnterFirst",
            ProvisionState::Confirm => "Confirm",
            ProvisionState::Done => "Done",
        };
        write!(f, "{state}")
    }
}

impl ProvisionState {
    /// Check if a transition to `target` is valid from this state.
    #[must_use]
    pub fn can_transition_to(&self, target: &ProvisionState) -> bool {
        matches!(
            (self, target),
            (ProvisionState::EnterFirst, ProvisionState::Confirm)
                | (ProvisionState::Confirm, ProvisionState::Done)
                | (ProvisionState::Confirm, ProvisionState::EnterFirst)
        )
    }
}

/// The provisioning machine: holds the transient first entry between the
/// two entry steps and enforces the transition rules.
#[derive(Debug)]
pub struct ProvisionMachine {
    state: ProvisionState,
    first: Option<Passcode>,
}

impl ProvisionMachine {
    /// Create a machine in `EnterFirst`.
    #[must_use]
    pub fn new() -> Self {
        ProvisionMachine {
            state: ProvisionState::EnterFirst,
            first: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ProvisionState {
        self.state
    }

    /// Accept a well-formed first entry and move to `Confirm`.
    ///
    /// # Errors
    /// Returns `Error::InvalidStateTransition` if the machine is not in
    /// `EnterFirst`.
    pub fn accept_first(&mut self, code: Passcode) -> Result<()> {
        self.transition(ProvisionState::Confirm)?;
        self.first = Some(code);
        Ok(())
    }

    /// Judge the confirmation entry.
    ///
    /// Returns the confirmed passcode and moves to `Done` iff the entry is
    /// exact and equal to the first entry; otherwise discards the first
    /// entry, moves back to `EnterFirst`, and returns `None`.
    ///
    /// # Errors
    /// Returns `Error::InvalidStateTransition` if the machine is not in
    /// `Confirm`.
    pub fn confirm(&mut self, entry: &PasscodeEntry) -> Result<Option<Passcode>> {
        if self.state != ProvisionState::Confirm {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: ProvisionState::Done.to_string(),
            });
        }

        let confirmed = entry
            .passcode()
            .filter(|re_entered| Some(re_entered) == self.first.as_ref());

        match confirmed {
            Some(code) => {
                self.transition(ProvisionState::Done)?;
                self.first = None;
                Ok(Some(code))
            }
            None => {
                debug!(len = entry.len(), "confirmation rejected");
                self.transition(ProvisionState::EnterFirst)?;
                self.first = None;
                Ok(None)
            }
        }
    }

    fn transition(&mut self, target: ProvisionState) -> Result<()> {
        if !self.state.can_transition_to(&target) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        self.state = target;
        Ok(())
    }
}

impl Default for ProvisionMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact_entry(digits: [u8; 5]) -> PasscodeEntry {
        let mut entry = PasscodeEntry::new();
        for d in digits {
            entry.push_digit(d);
        }
        entry.terminate();
        entry
    }

    fn short_entry(digits: &[u8]) -> PasscodeEntry {
        let mut entry = PasscodeEntry::new();
        for &d in digits {
            entry.push_digit(d);
        }
        entry.terminate();
        entry
    }

    #[test]
    fn test_new_machine_starts_in_enter_first() {
        let machine = ProvisionMachine::new();
        assert_eq!(machine.state(), ProvisionState::EnterFirst);
    }

    #[test]
    fn test_matching_confirmation_completes() {
        let mut machine = ProvisionMachine::new();
        machine.accept_first("12345".parse().unwrap()).unwrap();
        assert_eq!(machine.state(), ProvisionState::Confirm);

        let confirmed = machine.confirm(&exact_entry([1, 2, 3, 4, 5])).unwrap();
        assert_eq!(confirmed.unwrap().digits(), &[1, 2, 3, 4, 5]);
        assert_eq!(machine.state(), ProvisionState::Done);
    }

    #[test]
    fn test_differing_confirmation_loops_back() {
        let mut machine = ProvisionMachine::new();
        machine.accept_first("12345".parse().unwrap()).unwrap();

        let confirmed = machine.confirm(&exact_entry([1, 2, 3, 4, 6])).unwrap();
        assert!(confirmed.is_none());
        assert_eq!(machine.state(), ProvisionState::EnterFirst);
    }

    #[test]
    fn test_short_confirmation_loops_back() {
        let mut machine = ProvisionMachine::new();
        machine.accept_first("12345".parse().unwrap()).unwrap();

        let confirmed = machine.confirm(&short_entry(&[1, 2, 3])).unwrap();
        assert!(confirmed.is_none());
        assert_eq!(machine.state(), ProvisionState::EnterFirst);
    }

    #[test]
    fn test_long_confirmation_loops_back() {
        let mut machine = ProvisionMachine::new();
        machine.accept_first("12345".parse().unwrap()).unwrap();

        let confirmed = machine
            .confirm(&short_entry(&[1, 2, 3, 4, 5, 5]))
            .unwrap();
        assert!(confirmed.is_none());
        assert_eq!(machine.state(), ProvisionState::EnterFirst);
    }

    #[test]
    fn test_machine_is_reusable_after_rejection() {
        let mut machine = ProvisionMachine::new();
        machine.accept_first("12345".parse().unwrap()).unwrap();
        machine.confirm(&exact_entry([0, 0, 0, 0, 0])).unwrap();

        machine.accept_first("54321".parse().unwrap()).unwrap();
        let confirmed = machine.confirm(&exact_entry([5, 4, 3, 2, 1])).unwrap();
        assert!(confirmed.is_some());
    }

    #[test]
    fn test_confirm_before_first_is_a_transition_error() {
        let mut machine = ProvisionMachine::new();
        let result = machine.confirm(&exact_entry([1, 2, 3, 4, 5]));
        assert!(matches!(
            result,
            Err(Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_accept_first_twice_is_a_transition_error() {
        let mut machine = ProvisionMachine::new();
        machine.accept_first("12345".parse().unwrap()).unwrap();
        let result = machine.accept_first("12345".parse().unwrap());
        assert!(matches!(
            result,
            Err(Error::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_transition_rules() {
        assert!(ProvisionState::EnterFirst.can_transition_to(&ProvisionState::Confirm));
        assert!(ProvisionState::Confirm.can_transition_to(&ProvisionState::Done));
        assert!(ProvisionState::Confirm.can_transition_to(&ProvisionState::EnterFirst));
        assert!(!ProvisionState::EnterFirst.can_transition_to(&ProvisionState::Done));
        assert!(!ProvisionState::Done.can_transition_to(&ProvisionState::EnterFirst));
    }

    #[test]
    fn test_state_serialization() {
        let serialized = serde_json::to_string(&ProvisionState::EnterFirst).unwrap();
        assert_eq!(serialized, "\"enter_first\"");
    }
}
