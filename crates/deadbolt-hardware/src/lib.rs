//! Hardware abstraction layer for the Deadbolt nodes.
//!
//! This crate defines the trait contracts for the six peripherals the two
//! nodes consume (keypad, character display, door motor, alarm siren,
//! serial link, and persistent byte store) together with in-memory mock
//! implementations that make the whole system runnable and testable on a
//! host without any physical hardware.
//!
//! # Design Philosophy
//!
//! - **Async where the hardware blocks**: keypad reads, serial receives and
//!   store operations all block until the peripheral is ready, so those
//!   traits use native `async fn` (Edition 2024 RPITIT, no `async_trait`
//!   macro needed).
//! - **Fire-and-forget where the hardware gives no feedback**: the display,
//!   motor and siren accept commands and report nothing back, so those
//!   traits are synchronous and infallible, and therefore safe to drive
//!   from the timer interrupt path.
//! - **Mock + handle pairs**: each mock is created together with a
//!   cloneable handle (the `MockKeypad`/`MockKeypadHandle` split) so tests
//!   feed inputs and observe outputs from outside the node that owns the
//!   device.

pub mod error;
pub mod mock;
pub mod traits;

pub use error::{HardwareError, Result};
pub use traits::{
    AlarmSiren, Display, Key, Keypad, MotorCommand, MotorDrive, PersistentStore, SerialLink,
};
