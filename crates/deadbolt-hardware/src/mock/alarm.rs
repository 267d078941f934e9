//! Mock alarm siren.

use crate::traits::AlarmSiren;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

/// Mock siren device.
#[derive(Debug)]
pub struct MockAlarm {
    active: Arc<AtomicBool>,
    transitions: Arc<Mutex<Vec<bool>>>,
}

impl MockAlarm {
    /// Create a new mock siren and its observation handle.
    pub fn new() -> (Self, MockAlarmHandle) {
        let active = Arc::new(AtomicBool::new(false));
        let transitions = Arc::new(Mutex::new(Vec::new()));
        (
            MockAlarm {
                active: Arc::clone(&active),
                transitions: Arc::clone(&transitions),
            },
            MockAlarmHandle {
                active,
                transitions,
            },
        )
    }
}

impl AlarmSiren for MockAlarm {
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(active);
    }
}

/// Handle for observing a [`MockAlarm`].
#[derive(Debug, Clone)]
pub struct MockAlarmHandle {
    active: Arc<AtomicBool>,
    transitions: Arc<Mutex<Vec<bool>>>,
}

impl MockAlarmHandle {
    /// Whether the siren is currently on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Every on/off command issued so far, in order.
    #[must_use]
    pub fn transitions(&self) -> Vec<bool> {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_toggles() {
        let (alarm, handle) = MockAlarm::new();
        assert!(!handle.is_active());

        alarm.set_active(true);
        assert!(handle.is_active());

        alarm.set_active(false);
        assert!(!handle.is_active());
        assert_eq!(handle.transitions(), vec![true, false]);
    }
}
