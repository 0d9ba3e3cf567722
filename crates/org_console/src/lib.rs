pub mod hierarchy;

pub use hierarchy::{
    ancestor_chain, ancestor_levels, AncestorResolver, Entity, EntityId, GraphError, Level,
    LevelId, TypeGraph, MAX_GROUP_CASCADE_DEPTH, MIN_GROUP_CASCADE_DEPTH, PERCENTAGE_MAX,
    PERCENTAGE_MIN,
};

pub use hierarchy::{materialize, MaterializeDiagnostic, MaterializedForest, OrganizationNode};

pub use hierarchy::{
    flatten, sort_siblings, visible_count, ExpandState, PageRequest, Row, RowNumbering,
};

pub use hierarchy::{
    resolve_override, OverrideDiagnostic, OverrideDimension, OverrideMode, OverrideResolution,
    OverrideSetting, OverrideSource, OverrideStore, ResolvedOverride,
};

pub use hierarchy::{
    ConfigError, ConsoleConfig, DEFAULT_CONFIG_FILE_NAME, DEFAULT_PAGE_SIZE, ENV_INDENT_ROWS,
    ENV_PAGE_SIZE, ENV_ROW_NUMBERING,
};
