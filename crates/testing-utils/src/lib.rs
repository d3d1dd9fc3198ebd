//! # Hostgate Testing Utils
//!
//! Shared testing utilities for the hostgate workspace.
//!
//! - **Mock Collaborators**: scripted host directory and recording dispatcher
//! - **Test Data Builders**: utilities for creating tasks, hosts and catalogs
//! - **Helpers**: assignment configs tuned for fast tests
//!
//! ```toml
//! [dev-dependencies]
//! hostgate-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
