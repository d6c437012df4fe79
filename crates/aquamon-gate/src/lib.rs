//! AQUAMON Gate — optional per-item password protection.
//!
//! Protection here is advisory: it gates navigation in the console,
//! not access at the store, and the protecting secret is kept under a
//! deliberately reversible obfuscation so that creators and admins
//! can read it back. None of this is a security boundary and it must
//! not be mistaken for one.

pub mod error;
pub mod obfuscate;
pub mod service;

pub use error::GateError;
pub use service::{AccessGate, Caller};
