//! LaTeX module - Heuristic analysis of LaTeX sources
//!
//! - comments: escape-aware `%` comment stripping
//! - include: `\input` / `\include` expansion with cycle protection
//! - normalize: math and markup removal
//! - classify: character classes, words, formulas, code blocks, citations
//! - sections: heading-stack aggregation
//! - images: `\includegraphics` resolution
//! - title: document title detection

pub mod classify;
pub mod comments;
pub mod images;
pub mod include;
pub mod normalize;
pub mod sections;
pub mod title;
