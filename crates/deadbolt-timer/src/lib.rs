//! Tick timekeeping and actuation scheduling for a Deadbolt node.
//!
//! Each node owns exactly one timer resource. The timer turns a periodic
//! interrupt source into a monotonically increasing 16-bit tick count and
//! invokes at most one registered callback per interrupt; everything
//! time-boxed in the system (the door motor timeline, the alarm timeline)
//! is built from that single primitive.
//!
//! The crate splits the concern in two:
//!
//! - [`tick`]: the counter, the single callback slot, and the arm/disarm
//!   lifecycle of the interrupt source.
//! - [`timeline`]: the pure tick arithmetic of the door and alarm
//!   sequences; node crates attach actuator effects to the events.

pub mod tick;
pub mod timeline;

pub use tick::{
    Callback, InterruptLine, Tick, TickCounter, TickRate, TickTimer, TimerConfig, TimerError,
    TimerMode,
};
pub use timeline::{AlarmSchedule, DoorEvent, DoorSchedule};
