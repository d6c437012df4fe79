//! AQUAMON Auth — identity provider abstraction and session
//! management.
//!
//! The hosted auth backend is reached through the [`IdentityProvider`]
//! trait; [`MemoryIdentityProvider`] is the local stand-in used for
//! development and tests. [`SessionManager`] tracks the current
//! identity plus its denormalized profile, with an explicit
//! init/shutdown lifecycle instead of ambient global state.

pub mod error;
pub mod password;
pub mod provider;
pub mod session;

pub use error::AuthError;
pub use provider::{Identity, IdentityProvider, MemoryIdentityProvider};
pub use session::{SessionManager, SessionUser};
