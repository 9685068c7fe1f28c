//! Domain types - folder identity, state and configuration
//!
//! These types are shared by the model, the actor layer and the CLI, and are
//! independent of how folders are scanned or scheduled.

pub mod config;
pub mod folder;
