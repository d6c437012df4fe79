//! AQUAMON Core — domain models, repository trait definitions, the
//! hierarchy navigator, list reconciliation, and measurement export.
//!
//! This crate is I/O-free: persistence lives behind the traits in
//! [`repository`] and is implemented by `aquamon-db`.

pub mod error;
pub mod export;
pub mod models;
pub mod navigator;
pub mod reconcile;
pub mod repository;

pub use error::{AquamonError, AquamonResult};
