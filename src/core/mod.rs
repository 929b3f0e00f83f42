//! Core module - Argument classification and glob translation
//!
//! This module provides:
//! - Argument classifier (ParsedArguments)
//! - Glob to regex compiler
//! - Tool and matcher vocabulary
//! - Logging setup

pub mod args;
pub mod glob;
pub mod logging;
pub mod vocabulary;
