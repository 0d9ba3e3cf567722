//! Hierarchical organization engine - level graph, entity materialization,
//! tree flattening, and cascading override resolution.
//!
//! This module is organized into submodules:
//! - `types`: core type definitions (IDs, constants, levels, entities, settings)
//! - `type_graph`: organizational level graph construction and validation
//! - `ancestry`: ancestor-chain resolution over the level graph
//! - `materialize`: entity-tree materialization and diagnostics
//! - `tree_view`: expand/collapse flattening, pagination, row numbering
//! - `overrides`: override store and precedence resolution
//! - `config`: console configuration loading
//!
//! The engine is synchronous and stateless between calls. A built
//! `TypeGraph` is immutable (rebuilds swap whole instances); materialization
//! and flattening are pure functions of their inputs; `ExpandState` and
//! `OverrideStore` are caller-owned, single-writer-per-key maps.

mod ancestry;
mod config;
mod materialize;
mod overrides;
mod tree_view;
mod type_graph;
mod types;

#[cfg(test)]
mod tests;

// Re-export all public types
pub use ancestry::{ancestor_chain, ancestor_levels, AncestorResolver};
pub use config::{
    ConfigError, ConsoleConfig, DEFAULT_CONFIG_FILE_NAME, DEFAULT_PAGE_SIZE, ENV_INDENT_ROWS,
    ENV_PAGE_SIZE, ENV_ROW_NUMBERING,
};
pub use materialize::{materialize, MaterializeDiagnostic, MaterializedForest, OrganizationNode};
pub use overrides::{
    resolve_override, OverrideDiagnostic, OverrideResolution, OverrideSource, OverrideStore,
    ResolvedOverride,
};
pub use tree_view::{
    flatten, sort_siblings, visible_count, ExpandState, PageRequest, Row, RowNumbering,
};
pub use type_graph::{GraphError, TypeGraph};
pub use types::{
    Entity, EntityId, Level, LevelId, OverrideDimension, OverrideMode, OverrideSetting,
    MAX_GROUP_CASCADE_DEPTH, MIN_GROUP_CASCADE_DEPTH, PERCENTAGE_MAX, PERCENTAGE_MIN,
};
