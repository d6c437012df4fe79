//! Session management.
//!
//! [`SessionManager`] owns the "who is signed in" state for one
//! console process. It is constructed explicitly, started with
//! [`SessionManager::init`] (which subscribes to the provider's auth
//! state changes) and stopped with [`SessionManager::shutdown`] —
//! no ambient globals.
//!
//! Whenever the identity changes, the manager resolves the matching
//! [`UserProfile`]. A missing or unreadable profile does not block
//! sign-in: a default profile with role `user` is synthesized from
//! the identity instead.

use std::sync::{Arc, Mutex};

use aquamon_core::error::AquamonResult;
use aquamon_core::models::profile::{CreateProfile, Role, UserProfile};
use aquamon_core::repository::ProfileRepository;
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::error::AuthError;
use crate::provider::{Identity, IdentityProvider};

/// The signed-in identity together with its profile record.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub identity: Identity,
    pub profile: UserProfile,
}

/// Tracks the current session for one process.
pub struct SessionManager<P, R>
where
    P: IdentityProvider + Clone + Send + Sync + 'static,
    R: ProfileRepository + Clone + Send + Sync + 'static,
{
    provider: P,
    profiles: R,
    state: Arc<watch::Sender<Option<SessionUser>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

/// Build the fallback profile for an identity whose stored profile is
/// missing or unreadable.
fn default_profile(identity: &Identity) -> UserProfile {
    let now = Utc::now();
    UserProfile {
        uid: identity.uid,
        email: identity.email.clone(),
        display_name: if identity.display_name.is_empty() {
            "User".into()
        } else {
            identity.display_name.clone()
        },
        phone: String::new(),
        tax_id: String::new(),
        role: Role::User,
        created_at: now,
        updated_at: now,
    }
}

async fn resolve<R: ProfileRepository>(profiles: &R, identity: Identity) -> SessionUser {
    let profile = match profiles.get_by_uid(identity.uid).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(uid = %identity.uid, error = %e, "Profile lookup failed; using defaults");
            default_profile(&identity)
        }
    };
    SessionUser { identity, profile }
}

impl<P, R> SessionManager<P, R>
where
    P: IdentityProvider + Clone + Send + Sync + 'static,
    R: ProfileRepository + Clone + Send + Sync + 'static,
{
    pub fn new(provider: P, profiles: R) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            provider,
            profiles,
            state: Arc::new(state),
            listener: Mutex::new(None),
        }
    }

    /// Subscribe to the provider's auth state notifications and keep
    /// the session state in sync with them. Idempotent.
    pub fn init(&self) {
        let mut guard = self.listener.lock().unwrap_or_else(|p| p.into_inner());
        if guard.is_some() {
            return;
        }

        let mut rx = self.provider.subscribe();
        let profiles = self.profiles.clone();
        let state = Arc::clone(&self.state);

        *guard = Some(tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let identity = rx.borrow_and_update().clone();
                match identity {
                    Some(identity) => {
                        let user = resolve(&profiles, identity).await;
                        state.send_replace(Some(user));
                    }
                    None => {
                        state.send_replace(None);
                    }
                }
            }
        }));
    }

    /// Stop listening to provider notifications.
    pub fn shutdown(&self) {
        let mut guard = self.listener.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }

    /// Sign in and resolve the profile for the identity.
    pub async fn login(&self, email: &str, password: &str) -> AquamonResult<SessionUser> {
        let identity = self.provider.sign_in(email, password).await?;
        let user = resolve(&self.profiles, identity).await;
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Create an account and provision its profile with the default
    /// `user` role.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        phone: &str,
        tax_id: &str,
    ) -> AquamonResult<SessionUser> {
        let identity = self.provider.sign_up(email, password, display_name).await?;

        let profile = self
            .profiles
            .create(CreateProfile {
                uid: identity.uid,
                email: email.to_string(),
                display_name: display_name.to_string(),
                phone: phone.to_string(),
                tax_id: tax_id.to_string(),
                role: Role::User,
            })
            .await?;

        let user = SessionUser { identity, profile };
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Sign out and clear the session state.
    pub async fn logout(&self) -> AquamonResult<()> {
        self.provider.sign_out().await?;
        self.state.send_replace(None);
        Ok(())
    }

    /// Re-read the current user's profile without re-authenticating
    /// (e.g. after a profile edit).
    pub async fn refresh_user(&self) -> AquamonResult<SessionUser> {
        let identity = self
            .current_user()
            .map(|user| user.identity)
            .ok_or(AuthError::NotSignedIn)?;

        let profile = self.profiles.get_by_uid(identity.uid).await?;
        let user = SessionUser { identity, profile };
        self.state.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Change the signed-in user's password, re-authenticating with
    /// the current one first.
    pub async fn change_password(&self, current: &str, new: &str) -> AquamonResult<()> {
        if self.current_user().is_none() {
            return Err(AuthError::NotSignedIn.into());
        }
        self.provider.update_password(current, new).await
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.borrow().clone()
    }

    /// Observe session state transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.state.subscribe()
    }
}

impl<P, R> Drop for SessionManager<P, R>
where
    P: IdentityProvider + Clone + Send + Sync + 'static,
    R: ProfileRepository + Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
