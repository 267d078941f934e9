//! Credential persistence over the addressed byte store.
//!
//! The keeper holds the single authoritative credential copy in its
//! persistent store, element `i` at `base + i`. The store settles between
//! operations on its own; this layer only sequences the accesses.

use deadbolt_core::{Candidate, Passcode, constants::CREDENTIAL_BASE_ADDR};
use deadbolt_hardware::PersistentStore;
use tracing::debug;

use crate::error::KeeperError;

/// The persisted credential, addressed into a [`PersistentStore`].
#[derive(Debug)]
pub struct CredentialVault<S> {
    store: S,
    base_addr: u16,
}

impl<S: PersistentStore> CredentialVault<S> {
    /// Vault at the standard credential address.
    pub fn new(store: S) -> Self {
        Self::with_base_addr(store, CREDENTIAL_BASE_ADDR)
    }

    /// Vault at a specific base address.
    pub fn with_base_addr(store: S, base_addr: u16) -> Self {
        CredentialVault { store, base_addr }
    }

    /// Persist a passcode, element by element.
    ///
    /// # Errors
    /// Returns an error if the store rejects an address.
    pub async fn persist(&mut self, code: &Passcode) -> Result<(), KeeperError> {
        for (i, &digit) in code.digits().iter().enumerate() {
            self.store.write_byte(self.base_addr + i as u16, digit).await?;
        }
        debug!("credential persisted");
        Ok(())
    }

    /// Compare a candidate against the persisted credential.
    ///
    /// Reads the store element by element and short-circuits on the first
    /// mismatch; a wrong-length candidate arrives as the blank filler and
    /// fails on its first element.
    ///
    /// # Errors
    /// Returns an error if the store rejects an address.
    pub async fn matches(&mut self, candidate: &Candidate) -> Result<bool, KeeperError> {
        for (i, &element) in candidate.as_bytes().iter().enumerate() {
            let stored = self.store.read_byte(self.base_addr + i as u16).await?;
            if stored != element {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
