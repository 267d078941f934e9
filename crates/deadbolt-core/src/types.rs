use crate::{
    Result,
    constants::{ACTION_CHANGE, ACTION_OPEN, BLANK_ELEMENT, MAX_DIGIT, PASS_SIZE, VERDICT_MATCH, VERDICT_NO_MATCH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A validated passcode: `PASS_SIZE` digit codes in entry order.
///
/// Exactly one authoritative copy exists at runtime, owned by the keeper
/// node inside its persistent store; the panel only ever holds a transient
/// working copy for the duration of one lifecycle operation.
///
/// # Security
/// Comparison is constant-time to avoid leaking the position of the first
/// differing digit, and both `Debug` and `Display` redact the digits so a
/// passcode cannot leak through logs.
#[derive(Clone, Eq, Serialize, Deserialize)]
pub struct Passcode([u8; PASS_SIZE]);

impl Passcode {
    /// Create a passcode from raw digit codes with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigit` if any element is outside `0..=9`.
    pub fn new(digits: [u8; PASS_SIZE]) -> Result<Self> {
        for &d in &digits {
            if d > MAX_DIGIT {
                return Err(Error::InvalidDigit(d));
            }
        }
        Ok(Passcode(digits))
    }

    /// The digit codes in entry order.
    #[must_use]
    pub fn digits(&self) -> &[u8; PASS_SIZE] {
        &self.0
    }
}

/// Constant-time comparison implementation for Passcode
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the sequences differ.
impl PartialEq for Passcode {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Passcode(*****)")
    }
}

impl fmt::Display for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for _ in 0..PASS_SIZE {
            write!(f, "*")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Passcode {
    type Err = Error;

    /// Parse from an ASCII digit literal such as `"12345"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deadbolt_core::Passcode;
    ///
    /// let code: Passcode = "12345".parse().unwrap();
    /// assert_eq!(code.digits(), &[1, 2, 3, 4, 5]);
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != PASS_SIZE || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(Error::InvalidPasscodeLiteral(s.to_string()));
        }
        let mut digits = [0u8; PASS_SIZE];
        for (slot, &byte) in digits.iter_mut().zip(bytes) {
            *slot = byte - b'0';
        }
        Passcode::new(digits)
    }
}

/// A candidate credential as received off the wire.
///
/// Unlike [`Passcode`], a candidate is not digit-validated: the panel
/// deliberately transfers a [`BLANK_ELEMENT`]-filled candidate when the
/// operator entered a wrong-length sequence, so the keeper's comparison
/// rejects it while the protocol still moves exactly `PASS_SIZE` bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Candidate([u8; PASS_SIZE]);

impl Candidate {
    /// Wrap raw wire bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; PASS_SIZE]) -> Self {
        Candidate(bytes)
    }

    /// The candidate that matches nothing: every element is
    /// [`BLANK_ELEMENT`], which no stored credential contains.
    #[must_use]
    pub fn mismatch() -> Self {
        Candidate([BLANK_ELEMENT; PASS_SIZE])
    }

    /// Raw bytes in wire order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PASS_SIZE] {
        &self.0
    }

    /// Whether every element is a valid digit code.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.iter().all(|&d| d <= MAX_DIGIT)
    }
}

impl From<&Passcode> for Candidate {
    fn from(code: &Passcode) -> Self {
        Candidate(*code.digits())
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Candidate(*****)")
    }
}

/// Keeper verdict on one verification round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Candidate matched the persisted credential.
    Match,
    /// Candidate did not match the persisted credential.
    NoMatch,
}

impl Verdict {
    /// Parse a verdict from its wire byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidVerdict` for any byte other than the two
    /// verdict codes: both endpoints are ours, so a stray byte is a
    /// protocol violation, not a deniable candidate.
    #[inline]
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            VERDICT_MATCH => Ok(Verdict::Match),
            VERDICT_NO_MATCH => Ok(Verdict::NoMatch),
            _ => Err(Error::InvalidVerdict(byte)),
        }
    }

    /// Wire byte for this verdict.
    #[inline]
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            Verdict::Match => VERDICT_MATCH,
            Verdict::NoMatch => VERDICT_NO_MATCH,
        }
    }

    /// Returns `true` for [`Verdict::Match`].
    #[inline]
    #[must_use]
    pub fn is_match(self) -> bool {
        matches!(self, Verdict::Match)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Match => write!(f, "match"),
            Verdict::NoMatch => write!(f, "no match"),
        }
    }
}

/// Action the panel requests after a granted verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelAction {
    /// Run the door timeline.
    OpenDoor,
    /// Accept and persist a replacement passcode.
    ChangePasscode,
}

impl PanelAction {
    /// Parse an action from its wire byte.
    ///
    /// # Errors
    /// Returns `Error::InvalidAction` if the byte is neither action code.
    #[inline]
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            ACTION_OPEN => Ok(PanelAction::OpenDoor),
            ACTION_CHANGE => Ok(PanelAction::ChangePasscode),
            _ => Err(Error::InvalidAction(byte)),
        }
    }

    /// Wire byte for this action.
    #[inline]
    #[must_use]
    pub fn to_byte(self) -> u8 {
        match self {
            PanelAction::OpenDoor => ACTION_OPEN,
            PanelAction::ChangePasscode => ACTION_CHANGE,
        }
    }
}

impl fmt::Display for PanelAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PanelAction::OpenDoor => write!(f, "open door"),
            PanelAction::ChangePasscode => write!(f, "change passcode"),
        }
    }
}
