//! Build graph construction for multi-page static sites.
//!
//! Discovers which source files are independent build targets and binds each
//! of them to an output artifact.
//!
//! # Overview
//!
//! Data flows strictly upward through:
//! - **Discovery**: match glob rules against a family root, minus exclusions
//! - **Keys**: derive a stable logical key from each matched path
//! - **Registry**: collect key → source per family, rejecting collisions
//! - **Binding**: turn every registry entry into an artifact descriptor
//! - **Assembly**: merge all families and static rules into a [`BuildGraph`]
//!
//! # Example
//!
//! ```ignore
//! use sitegraph::build::{plan, BuildContext};
//! use sitegraph::config::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let graph = plan(&context)?;
//! println!("{}", graph.to_json_pretty()?);
//! ```

pub mod artifact;
pub mod backend;
pub mod context;
pub mod discovery;
pub mod error;
pub mod family;
pub mod graph;
pub mod key;
pub mod mode;
pub mod pipeline;
pub mod planner;
pub mod registry;
pub mod result;

pub use artifact::*;
pub use backend::*;
pub use context::*;
pub use discovery::*;
pub use error::*;
pub use family::*;
pub use graph::*;
pub use key::*;
pub use mode::*;
pub use pipeline::*;
pub use planner::*;
pub use registry::*;
pub use result::*;
