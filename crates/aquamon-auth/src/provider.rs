//! Identity provider abstraction.
//!
//! The hosted auth backend lives behind [`IdentityProvider`]; the
//! console never talks to it directly. [`MemoryIdentityProvider`] is
//! the in-process implementation used for development and tests,
//! storing Argon2id-hashed credentials and broadcasting sign-in state
//! on a watch channel the way the hosted SDK pushes auth state
//! changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aquamon_core::error::AquamonResult;
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::AuthError;
use crate::password;

/// An authenticated identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: Uuid,
    pub email: String,
    pub display_name: String,
}

/// Sign-in / sign-up / sign-out surface of the auth backend, plus a
/// subscription to its state-change notifications.
pub trait IdentityProvider: Send + Sync {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AquamonResult<Identity>> + Send;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> impl Future<Output = AquamonResult<Identity>> + Send;

    fn sign_out(&self) -> impl Future<Output = AquamonResult<()>> + Send;

    /// Change the signed-in user's password. Re-authenticates with
    /// the current password before applying the new one.
    fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> impl Future<Output = AquamonResult<()>> + Send;

    /// The identity currently signed in, if any.
    fn current(&self) -> Option<Identity>;

    /// Subscribe to sign-in state changes.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

struct Account {
    uid: Uuid,
    display_name: String,
    password_hash: String,
}

struct Inner {
    accounts: Mutex<HashMap<String, Account>>,
    state: watch::Sender<Option<Identity>>,
}

/// In-memory identity provider.
#[derive(Clone)]
pub struct MemoryIdentityProvider {
    inner: Arc<Inner>,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                accounts: Mutex::new(HashMap::new()),
                state,
            }),
        }
    }

    fn lock_accounts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        // Lock poisoning only happens if a holder panicked; the map
        // itself is still consistent, so keep going.
        self.inner
            .accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_in(&self, email: &str, supplied: &str) -> AquamonResult<Identity> {
        let identity = {
            let accounts = self.lock_accounts();
            let account = accounts.get(email).ok_or(AuthError::InvalidCredentials)?;
            if !password::verify_password(supplied, &account.password_hash)? {
                return Err(AuthError::InvalidCredentials.into());
            }
            Identity {
                uid: account.uid,
                email: email.to_string(),
                display_name: account.display_name.clone(),
            }
        };

        self.inner.state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        supplied: &str,
        display_name: &str,
    ) -> AquamonResult<Identity> {
        let password_hash = password::hash_password(supplied)?;
        let identity = {
            let mut accounts = self.lock_accounts();
            if accounts.contains_key(email) {
                return Err(AuthError::EmailTaken.into());
            }
            let uid = Uuid::new_v4();
            accounts.insert(
                email.to_string(),
                Account {
                    uid,
                    display_name: display_name.to_string(),
                    password_hash,
                },
            );
            Identity {
                uid,
                email: email.to_string(),
                display_name: display_name.to_string(),
            }
        };

        self.inner.state.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AquamonResult<()> {
        self.inner.state.send_replace(None);
        Ok(())
    }

    async fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> AquamonResult<()> {
        let identity = self.current().ok_or(AuthError::NotSignedIn)?;
        let new_hash = password::hash_password(new_password)?;

        let mut accounts = self.lock_accounts();
        let account = accounts
            .get_mut(&identity.email)
            .ok_or(AuthError::InvalidCredentials)?;
        if !password::verify_password(current_password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials.into());
        }
        account.password_hash = new_hash;
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        self.inner.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let provider = MemoryIdentityProvider::new();
        let created = provider
            .sign_up("alice@example.com", "correct horse", "Alice")
            .await
            .unwrap();

        provider.sign_out().await.unwrap();
        assert!(provider.current().is_none());

        let identity = provider
            .sign_in("alice@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(identity, created);
        assert_eq!(provider.current(), Some(identity));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider
            .sign_up("alice@example.com", "correct horse", "Alice")
            .await
            .unwrap();

        assert!(provider.sign_in("alice@example.com", "wrong").await.is_err());
        assert!(provider.sign_in("nobody@example.com", "x").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider
            .sign_up("alice@example.com", "pw-one", "Alice")
            .await
            .unwrap();
        assert!(
            provider
                .sign_up("alice@example.com", "pw-two", "Imposter")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn update_password_requires_current() {
        let provider = MemoryIdentityProvider::new();
        provider
            .sign_up("alice@example.com", "old-password", "Alice")
            .await
            .unwrap();

        assert!(provider.update_password("wrong", "new").await.is_err());
        provider
            .update_password("old-password", "new-password")
            .await
            .unwrap();

        provider.sign_out().await.unwrap();
        assert!(
            provider
                .sign_in("alice@example.com", "old-password")
                .await
                .is_err()
        );
        provider
            .sign_in("alice@example.com", "new-password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscribers_observe_state_changes() {
        let provider = MemoryIdentityProvider::new();
        let mut rx = provider.subscribe();
        assert!(rx.borrow().is_none());

        provider
            .sign_up("alice@example.com", "pw", "Alice")
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        provider.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
