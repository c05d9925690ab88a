//! core
//!
//! Core domain types and algorithms for Folio.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NodeName, ItemId, ComponentId, etc.
//! - [`node`] - The document tree and path-based navigation
//! - [`path`] - The path grammar for addressing nodes
//! - [`attrs`] - Attribute storage, merge policy, set encoding
//! - [`order`] - The before/after ordering resolver
//! - [`naming`] - Node naming rules and unique-name generation
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Every transformation is deterministic and total
//! - Degraded output beats no output: cycles relax, collisions rename

pub mod attrs;
pub mod config;
pub mod naming;
pub mod node;
pub mod order;
pub mod path;
pub mod types;
