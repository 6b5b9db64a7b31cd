//! Common test utilities for casc-plugins
//!
//! - Plugin builders for installed plugin lists
//! - Bundle fixtures written to temporary directories

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
