//! Flows module - Operations combining the LaTeX scanners
//!
//! Provides:
//! - report: Document statistics for a multi-file LaTeX project

pub mod report;
