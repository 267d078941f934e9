//! Tick schedules for the two actuation timelines.
//!
//! A timeline is a finite ordered set of (tick, action) pairs, created when
//! an actuation begins and consumed tick-by-tick by the timer callback. The
//! schedules here are the pure tick arithmetic; the node crates attach the
//! effects (the keeper drives the motor and the siren, the panel drives its
//! display) by matching on the event in their registered callback.
//!
//! Only one timeline may be armed per node at a time, a consequence of the
//! timer's single callback slot, not an extra mechanism.

use serde::{Deserialize, Serialize};

use crate::tick::{Tick, TickRate};

/// Seconds into the door timeline at which the motor stops (door open).
pub const DOOR_STOP_SECS: u32 = 15;

/// Seconds into the door timeline at which the motor reverses (door
/// closing).
pub const DOOR_REVERSE_SECS: u32 = 18;

/// Seconds at which the door timeline completes.
pub const DOOR_FINISH_SECS: u32 = 33;

/// Seconds at which the alarm timeline completes.
pub const ALARM_FINISH_SECS: u32 = 60;

/// Discrete event in the door timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorEvent {
    /// Motor stops; the door holds open.
    Stop,
    /// Motor reverses; the door starts closing.
    Reverse,
    /// Motor stops; the timeline is over.
    Finish,
}

/// The door motor timeline: open, hold, close, done.
///
/// All marks are derived from the configured tick rate; with the default
/// 32 ticks/second the stop lands on tick 480, the reverse on 576 and the
/// finish on 1056.
///
/// # Examples
///
/// ```
/// use deadbolt_timer::{DoorEvent, DoorSchedule, TickRate};
///
/// let schedule = DoorSchedule::new(TickRate::default());
/// assert_eq!(schedule.event_at(480), Some(DoorEvent::Stop));
/// assert_eq!(schedule.event_at(576), Some(DoorEvent::Reverse));
/// assert_eq!(schedule.event_at(1056), Some(DoorEvent::Finish));
/// assert_eq!(schedule.event_at(481), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorSchedule {
    stop_at: Tick,
    reverse_at: Tick,
    finish_at: Tick,
}

impl DoorSchedule {
    /// Build the schedule for a tick rate.
    #[must_use]
    pub fn new(rate: TickRate) -> Self {
        DoorSchedule {
            stop_at: rate.ticks_in(DOOR_STOP_SECS),
            reverse_at: rate.ticks_in(DOOR_REVERSE_SECS),
            finish_at: rate.ticks_in(DOOR_FINISH_SECS),
        }
    }

    /// The event falling on `tick`, if any.
    #[must_use]
    pub fn event_at(&self, tick: Tick) -> Option<DoorEvent> {
        if tick == self.stop_at {
            Some(DoorEvent::Stop)
        } else if tick == self.reverse_at {
            Some(DoorEvent::Reverse)
        } else if tick == self.finish_at {
            Some(DoorEvent::Finish)
        } else {
            None
        }
    }

    /// Tick at which the motor stops.
    #[must_use]
    pub fn stop_tick(&self) -> Tick {
        self.stop_at
    }

    /// Tick at which the motor reverses.
    #[must_use]
    pub fn reverse_tick(&self) -> Tick {
        self.reverse_at
    }

    /// Terminal tick of the timeline.
    #[must_use]
    pub fn finish_tick(&self) -> Tick {
        self.finish_at
    }
}

/// The alarm timeline: siren on at arm time, off at the single deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmSchedule {
    finish_at: Tick,
}

impl AlarmSchedule {
    /// Build the schedule for a tick rate.
    #[must_use]
    pub fn new(rate: TickRate) -> Self {
        AlarmSchedule {
            finish_at: rate.ticks_in(ALARM_FINISH_SECS),
        }
    }

    /// Terminal tick of the timeline.
    #[must_use]
    pub fn finish_tick(&self) -> Tick {
        self.finish_at
    }

    /// Whether `tick` is the terminal tick.
    #[must_use]
    pub fn is_finish(&self, tick: Tick) -> bool {
        tick == self.finish_at
    }
}
