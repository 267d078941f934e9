//! Shared constants for the Deadbolt two-node protocol.
//!
//! Both nodes are compiled against this module, which is how the protocol
//! gets away with no length prefixes and no negotiation: the credential
//! size, the control bytes, and the store layout are equal on both sides by
//! construction.
//!
//! # Byte Alphabet
//!
//! Credential elements on the wire are raw digit codes `0..=9`. Every
//! control byte below is chosen outside that range so a control code can
//! never be mistaken for a credential element (see
//! `tests::control_bytes_are_disjoint_from_digits`).

// ============================================================================
// Credential sizing
// ============================================================================

/// Number of digit elements in a passcode.
///
/// Fixed at compile time on both nodes; the payload transfer sends exactly
/// this many bytes with no length prefix.
pub const PASS_SIZE: usize = 5;

/// Highest valid credential element code (digits are `0..=MAX_DIGIT`).
pub const MAX_DIGIT: u8 = 9;

/// Filler element used to build a guaranteed-mismatch candidate.
///
/// A stored credential contains only digit codes, so a candidate containing
/// this value in any compared position can never verify. The panel uses it
/// to normalize wrong-length verification entries into a fixed-size
/// candidate that is still rejected downstream.
///
/// # Examples
///
/// ```
/// use deadbolt_core::constants::{BLANK_ELEMENT, MAX_DIGIT};
///
/// assert!(BLANK_ELEMENT > MAX_DIGIT);
/// ```
pub const BLANK_ELEMENT: u8 = 0xFF;

// ============================================================================
// Rendezvous control bytes
// ============================================================================

/// Sent by the transferring side to open a rendezvous.
pub const SENDER_READY: u8 = 0x20;

/// Sent by the receiving side once it has seen [`SENDER_READY`].
pub const RECEIVER_READY: u8 = 0x10;

// ============================================================================
// Verdict and action bytes
// ============================================================================

/// Keeper verdict: candidate matched the persisted credential.
pub const VERDICT_MATCH: u8 = 0xA1;

/// Keeper verdict: candidate did not match the persisted credential.
pub const VERDICT_NO_MATCH: u8 = 0xA0;

/// Panel action request: run the door timeline.
pub const ACTION_OPEN: u8 = b'+';

/// Panel action request: accept a replacement passcode.
pub const ACTION_CHANGE: u8 = b'-';

// ============================================================================
// Keypad codes
// ============================================================================

/// Key code of the terminator ("enter") key.
pub const KEY_ENTER: u8 = 0x0D;

/// Upper bound on keypad reads for one terminator-delimited entry.
///
/// A confirmation or verification entry stops at the terminator key or
/// after this many reads, whichever comes first.
pub const MAX_ENTRY_READS: usize = 16;

// ============================================================================
// Verification bounds
// ============================================================================

/// Consecutive failed verification rounds tolerated before lockout.
///
/// The keeper arms the alarm timeline after this many back-to-back denies
/// with no intervening grant; the panel gives up requesting rounds at the
/// same bound. A grant resets the count.
pub const MAX_VERIFY_ROUNDS: usize = 3;

// ============================================================================
// Persistent store layout
// ============================================================================

/// Base address of the persisted credential in the keeper's byte store.
///
/// Element `i` of the credential lives at `CREDENTIAL_BASE_ADDR + i`.
pub const CREDENTIAL_BASE_ADDR: u16 = 0x0014;

/// Settle delay the store needs between consecutive operations
/// (milliseconds). A documented latency constraint of the part, honored by
/// the store implementations rather than enforced by the interface.
pub const STORE_SETTLE_MS: u64 = 20;

// ============================================================================
// Display geometry
// ============================================================================

/// Rows on the panel's character display.
pub const DISPLAY_ROWS: u8 = 2;

/// Columns on the panel's character display.
pub const DISPLAY_COLS: u8 = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bytes_are_disjoint_from_digits() {
        let control = [
            SENDER_READY,
            RECEIVER_READY,
            VERDICT_MATCH,
            VERDICT_NO_MATCH,
            ACTION_OPEN,
            ACTION_CHANGE,
            KEY_ENTER,
            BLANK_ELEMENT,
        ];
        for byte in control {
            assert!(byte > MAX_DIGIT, "control byte {byte:#04x} shadows a digit");
        }
    }

    #[test]
    fn control_bytes_are_pairwise_distinct() {
        let control = [
            SENDER_READY,
            RECEIVER_READY,
            VERDICT_MATCH,
            VERDICT_NO_MATCH,
            ACTION_OPEN,
            ACTION_CHANGE,
            KEY_ENTER,
            BLANK_ELEMENT,
        ];
        for (i, a) in control.iter().enumerate() {
            for b in &control[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
