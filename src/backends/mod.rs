//! Backends module - External tool integrations
//!
//! Provides:
//! - lister: hg/git file listing stage
//! - pipeline: shell pipeline assembly and execution
//! - doctor: version report of the driven utilities

pub mod doctor;
pub mod lister;
pub mod pipeline;
