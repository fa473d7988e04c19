//! Sitegraph - entry discovery and build graph construction for multi-page static sites
//!
//! This library provides functionality to:
//! - Discover page templates, stylesheets and script entry points by glob rules
//! - Derive stable logical keys and reject key collisions
//! - Bind every entry to an output artifact for the selected build mode
//! - Assemble a deterministic build graph and hand it to pluggable backends

pub mod build;
pub mod cli;
pub mod config;
