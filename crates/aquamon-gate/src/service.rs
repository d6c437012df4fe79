//! Access gate orchestration.
//!
//! Generic over the protection store and profile repository so the
//! gate has no dependency on the database crate.
//!
//! The verification path fails OPEN: any internal failure while
//! checking a secret (missing row, undecodable stored value, store
//! unavailable) admits the caller rather than locking everyone out.
//! That is the contract callers rely on, questionable as it is.

use aquamon_core::error::{AquamonError, AquamonResult};
use aquamon_core::models::profile::Role;
use aquamon_core::models::protection::{Collection, ProtectionUpdate};
use aquamon_core::repository::{ProfileRepository, ProtectionStore};
use tracing::warn;
use uuid::Uuid;

use crate::error::GateError;
use crate::obfuscate;

/// The authenticated identity attempting a gated operation.
///
/// `display_name` is what the creator-bypass rule matches against:
/// hierarchy rows stamp `created_by` with the display name, not the
/// uid.
#[derive(Debug, Clone)]
pub struct Caller {
    pub uid: Uuid,
    pub display_name: String,
}

/// Per-item password protection service.
pub struct AccessGate<S: ProtectionStore, P: ProfileRepository> {
    store: S,
    profiles: P,
}

impl<S: ProtectionStore, P: ProfileRepository> AccessGate<S, P> {
    pub fn new(store: S, profiles: P) -> Self {
        Self { store, profiles }
    }

    async fn is_admin(&self, caller: &Caller) -> bool {
        match self.profiles.get_by_uid(caller.uid).await {
            Ok(profile) => profile.role == Role::Admin,
            Err(_) => false,
        }
    }

    /// True if the caller may change this item's protection settings:
    /// admins always, otherwise only the item's creator. Internal
    /// errors yield `false`.
    pub async fn has_edit_permission(
        &self,
        caller: &Caller,
        collection: Collection,
        id: Uuid,
    ) -> bool {
        if self.is_admin(caller).await {
            return true;
        }
        match self.store.load(collection, id).await {
            Ok(record) => record.created_by == caller.display_name,
            Err(_) => false,
        }
    }

    /// Enable or disable protection on an item.
    ///
    /// Enabling with no new secret silently reuses the stored one if
    /// present, and fails with [`GateError::SecretRequired`] when
    /// there is nothing to reuse. Disabling clears the secret and the
    /// protection stamp fields.
    ///
    /// Permission is checked before the row is read, so callers
    /// without rights get the same denial for missing and present
    /// ids.
    pub async fn set_protection(
        &self,
        caller: &Caller,
        collection: Collection,
        id: Uuid,
        protected: bool,
        new_secret: Option<&str>,
    ) -> AquamonResult<()> {
        if !self.has_edit_permission(caller, collection, id).await {
            return Err(GateError::PermissionDenied(
                "only the creator or an admin may change this item's protection".into(),
            )
            .into());
        }

        let record = self.store.load(collection, id).await?;

        let secret = if protected {
            match new_secret {
                Some(s) if !s.trim().is_empty() => Some(obfuscate::obfuscate(s)),
                _ if record.is_protected && record.secret.is_some() => record.secret,
                _ => return Err(GateError::SecretRequired.into()),
            }
        } else {
            None
        };

        self.store
            .store(
                collection,
                id,
                ProtectionUpdate {
                    is_protected: protected,
                    secret,
                    changed_by: protected.then(|| caller.display_name.clone()),
                },
            )
            .await
    }

    /// Check a supplied secret against an item.
    ///
    /// Unprotected items, creators and admins all pass regardless of
    /// input. A protected item with no stored secret also passes (the
    /// flag alone gates nothing). Any internal failure passes too —
    /// fail open, by contract.
    pub async fn verify(
        &self,
        caller: Option<&Caller>,
        collection: Collection,
        id: Uuid,
        supplied: &str,
    ) -> bool {
        let record = match self.store.load(collection, id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Protection lookup failed during verify; admitting");
                return true;
            }
        };

        if !record.is_protected {
            return true;
        }

        if let Some(caller) = caller {
            if record.created_by == caller.display_name || self.is_admin(caller).await {
                return true;
            }
        }

        let Some(stored) = record.secret else {
            return true;
        };

        match obfuscate::deobfuscate(&stored) {
            Ok(plain) => plain == supplied,
            Err(e) => {
                warn!(error = %e, "Stored secret is undecodable; admitting");
                true
            }
        }
    }

    /// Reveal the plaintext secret to the creator or an admin.
    ///
    /// Returns `None` when the item is not protected or has no stored
    /// secret.
    pub async fn revealed_secret(
        &self,
        caller: &Caller,
        collection: Collection,
        id: Uuid,
    ) -> AquamonResult<Option<String>> {
        if !self.has_edit_permission(caller, collection, id).await {
            return Err(GateError::PermissionDenied(
                "only the creator or an admin may view this item's secret".into(),
            )
            .into());
        }

        let record = self.store.load(collection, id).await?;
        match record.secret.filter(|_| record.is_protected) {
            Some(stored) => {
                let plain = obfuscate::deobfuscate(&stored)
                    .map_err(AquamonError::from)?;
                Ok(Some(plain))
            }
            None => Ok(None),
        }
    }
}
