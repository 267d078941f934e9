//! The lock-step serial protocol between the panel and the keeper.
//!
//! Every exchange on the link follows the same shape:
//!
//! 1. **Rendezvous**: the transferring side announces `SENDER_READY` and
//!    blocks until it sees `RECEIVER_READY`; the receiving side blocks
//!    until it sees `SENDER_READY`, then answers. This synchronizes two
//!    independently clocked nodes before any payload moves. There is no
//!    timeout and no retry: a stalled peer stalls its partner indefinitely,
//!    which is accepted for this closed two-node system.
//! 2. **Payload**: exactly `PASS_SIZE` bytes in element order. No length
//!    prefix, no checksum; the length is a compile-time constant shared by
//!    both nodes by construction.
//! 3. **Verdict/action**: single-byte control codes parsed strictly; an
//!    unknown byte is a protocol violation, not a deniable candidate.
//!
//! The functions are generic over any [`SerialLink`], so the same code runs
//! against the in-memory mock pair in tests and against a real UART
//! wrapper on a device.
//!
//! [`SerialLink`]: deadbolt_hardware::SerialLink

pub mod error;
pub mod handshake;

pub use error::{ProtocolError, Result};
pub use handshake::{
    recv_action, recv_candidate, recv_passcode, recv_verdict, rendezvous_as_receiver,
    rendezvous_as_sender, send_action, send_candidate, send_passcode, send_verdict,
};
