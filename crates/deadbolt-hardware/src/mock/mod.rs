//! Mock device implementations for testing and development.
//!
//! Each mock is created together with a cloneable handle that lets tests
//! feed inputs and observe outputs from outside the node owning the device.

pub mod alarm;
pub mod display;
pub mod keypad;
pub mod motor;
pub mod serial;
pub mod store;

// Re-export commonly used types
pub use alarm::{MockAlarm, MockAlarmHandle};
pub use display::{MockDisplay, MockDisplayHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use motor::{MockMotor, MockMotorHandle};
pub use serial::MockSerialLink;
pub use store::{MockStore, MockStoreHandle};
