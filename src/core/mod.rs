//! Core module - Report model and supporting utilities
//!
//! This module provides:
//! - Report model (DocumentReport) and typed errors
//! - Rendering functions for text and json output
//! - Path normalization and include-target resolution
//! - File reading strategies
//! - Common utilities

pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
