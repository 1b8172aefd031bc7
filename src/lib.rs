//! caspier - headless kernel of a browser IDE for Casper smart contracts.
//!
//! Modules:
//! - models: file tree snapshots, tree history, ids
//! - kernel: store, reducers, derived views and the service layer

pub mod kernel;
pub mod models;
