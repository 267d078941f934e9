//! Bounded keypad entry reading.
//!
//! Two reading disciplines exist, matching the two places the operator
//! types a passcode:
//!
//! - [`read_exact_entry`]: first-time entry, exactly `PASS_SIZE` digits
//!   followed by the terminator. Anything else is a format error that
//!   restarts the step.
//! - [`read_bounded_entry`]: confirmation and verification entry, up to
//!   `MAX_ENTRY_READS` key presses, stopped early by the terminator. The
//!   result carries an explicit entered length, so a wrong-length entry is
//!   detected by comparing lengths rather than by poisoning the buffer
//!   with a sentinel element.
//!
//! Every accepted digit echoes a `*` on the display's second row.

use deadbolt_core::{
    Candidate, Passcode,
    constants::{MAX_ENTRY_READS, PASS_SIZE},
};
use deadbolt_hardware::{Display, Key, Keypad};
use tracing::trace;

use crate::error::PanelError;

/// Outcome of a first-time exact entry.
#[derive(Debug)]
pub enum ExactEntry {
    /// Exactly `PASS_SIZE` digits and a terminator were read.
    Accepted(Passcode),
    /// Wrong shape (early terminator, overlong entry, or a non-digit
    /// key). The caller restarts the entry step.
    FormatError,
}

/// A terminator-aware bounded entry with its explicit entered length.
///
/// Only the first `PASS_SIZE` digits are stored; the length keeps counting
/// beyond that so wrong-length entries are recognized as such. An entry
/// that saw a non-digit key, missed its terminator inside the read bound,
/// or has the wrong length maps to the guaranteed-mismatch candidate.
#[derive(Debug, Clone, Copy)]
pub struct PasscodeEntry {
    digits: [u8; PASS_SIZE],
    len: usize,
    terminated: bool,
    foreign: bool,
}

impl PasscodeEntry {
    pub(crate) fn new() -> Self {
        PasscodeEntry {
            digits: [0; PASS_SIZE],
            len: 0,
            terminated: false,
            foreign: false,
        }
    }

    pub(crate) fn push_digit(&mut self, digit: u8) {
        if self.len < PASS_SIZE {
            self.digits[self.len] = digit;
        }
        self.len += 1;
    }

    /// Record a non-digit, non-terminator key press. It occupies a
    /// position but can never match a stored digit.
    pub(crate) fn push_foreign(&mut self) {
        self.foreign = true;
        self.len += 1;
    }

    pub(crate) fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Number of key presses recorded before the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no key press was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this entry is exactly `PASS_SIZE` digits terminated by the
    /// enter key.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.terminated && !self.foreign && self.len == PASS_SIZE
    }

    /// The validated passcode, if the entry is exact.
    #[must_use]
    pub fn passcode(&self) -> Option<Passcode> {
        if self.is_exact() {
            Passcode::new(self.digits).ok()
        } else {
            None
        }
    }

    /// The wire candidate for this entry.
    ///
    /// Exact entries transfer their digits; anything else transfers the
    /// [`Candidate::mismatch`] filler, so the keeper still receives a
    /// fixed-size payload and still burns a verification round on it.
    #[must_use]
    pub fn candidate(&self) -> Candidate {
        match self.passcode() {
            Some(code) => Candidate::from(&code),
            None => Candidate::mismatch(),
        }
    }
}

/// Read a first-time entry: exactly `PASS_SIZE` digits plus terminator.
///
/// # Errors
/// Returns an error only if the keypad goes away; format problems are an
/// [`ExactEntry::FormatError`], recovered by the caller.
pub async fn read_exact_entry<K: Keypad, D: Display>(
    keypad: &mut K,
    display: &D,
    prompt: &str,
) -> Result<ExactEntry, PanelError> {
    display.clear();
    display.print_str(prompt);
    display.move_cursor(1, 0);

    let mut digits = [0u8; PASS_SIZE];
    for position in 0..=PASS_SIZE {
        let key = keypad.read_key().await?;
        match (position, key) {
            (p, Key::Digit(d)) if p < PASS_SIZE => {
                display.print_char('*');
                digits[p] = d;
            }
            (p, Key::Enter) if p == PASS_SIZE => {
                let code = Passcode::new(digits)?;
                return Ok(ExactEntry::Accepted(code));
            }
            _ => {
                trace!(position, "first entry format error");
                return Ok(ExactEntry::FormatError);
            }
        }
    }
    unreachable!("loop returns at or before position PASS_SIZE")
}

/// Read a terminator-aware bounded entry (confirmation or verification).
///
/// Stops at the enter key or after `MAX_ENTRY_READS` presses, whichever
/// comes first. Every non-terminator press echoes a `*`.
///
/// # Errors
/// Returns an error only if the keypad goes away.
pub async fn read_bounded_entry<K: Keypad, D: Display>(
    keypad: &mut K,
    display: &D,
    prompt: &str,
) -> Result<PasscodeEntry, PanelError> {
    display.clear();
    display.print_str(prompt);
    display.move_cursor(1, 0);

    let mut entry = PasscodeEntry::new();
    for _ in 0..MAX_ENTRY_READS {
        match keypad.read_key().await? {
            Key::Enter => {
                entry.terminate();
                break;
            }
            Key::Digit(d) => {
                display.print_char('*');
                entry.push_digit(d);
            }
            _ => {
                display.print_char('*');
                entry.push_foreign();
            }
        }
    }
    trace!(len = entry.len(), exact = entry.is_exact(), "entry read");
    Ok(entry)
}
