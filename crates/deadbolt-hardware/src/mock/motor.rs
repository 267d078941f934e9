//! Mock door motor.
//!
//! Records every command it is issued so tests can assert on the exact
//! actuation sequence (one stop at the stop tick, one reverse at the
//! reverse tick, and so on).

use crate::traits::{MotorCommand, MotorDrive};
use std::sync::{Arc, Mutex, PoisonError};

/// Mock motor device.
#[derive(Debug)]
pub struct MockMotor {
    log: Arc<Mutex<Vec<MotorCommand>>>,
}

impl MockMotor {
    /// Create a new mock motor and its observation handle.
    pub fn new() -> (Self, MockMotorHandle) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (
            MockMotor {
                log: Arc::clone(&log),
            },
            MockMotorHandle { log },
        )
    }
}

impl MotorDrive for MockMotor {
    fn rotate(&self, command: MotorCommand) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

/// Handle for inspecting the command history of a [`MockMotor`].
#[derive(Debug, Clone)]
pub struct MockMotorHandle {
    log: Arc<Mutex<Vec<MotorCommand>>>,
}

impl MockMotorHandle {
    /// All commands issued so far, in order.
    #[must_use]
    pub fn history(&self) -> Vec<MotorCommand> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent command, if any.
    #[must_use]
    pub fn last(&self) -> Option<MotorCommand> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// How many times `command` was issued.
    #[must_use]
    pub fn count_of(&self, command: MotorCommand) -> usize {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|&&c| c == command)
            .count()
    }
}
