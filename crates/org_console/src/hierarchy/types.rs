//! Core type definitions: IDs, constants, levels, entities, and override settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Type Aliases
// ============================================================================

pub type LevelId = String;
pub type EntityId = String;

// ============================================================================
// Constants
// ============================================================================

pub const MIN_GROUP_CASCADE_DEPTH: u32 = 1;
pub const MAX_GROUP_CASCADE_DEPTH: u32 = 3;
pub const PERCENTAGE_MIN: f64 = 0.0;
pub const PERCENTAGE_MAX: f64 = 100.0;

// ============================================================================
// Organizational Levels
// ============================================================================

/// One rung of the organizational hierarchy (e.g. "distributor"), independent
/// of any concrete agent or member. Levels are authored by the configuration
/// collaborator; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub label: String,
    /// Opaque styling reference resolved by the display layer.
    pub color_token: String,
    /// Deterministic sibling/root ordering key.
    pub hierarchy_order: i32,
    /// Extension payload carried through untouched.
    #[serde(default)]
    pub extra: Value,
}

impl Level {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        color_token: impl Into<String>,
        hierarchy_order: i32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color_token: color_token.into(),
            hierarchy_order,
            extra: Value::Null,
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A concrete agent or member record supplied by the directory collaborator.
/// `parent_entity_id` links the entity that introduced this one; it is an
/// organizational-tree edge, distinct from the level hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub level_id: LevelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_entity_id: Option<EntityId>,
    /// Balances, counters, and other display payload carried through untouched.
    #[serde(default)]
    pub payload: Value,
}

impl Entity {
    pub fn new(id: impl Into<String>, level_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level_id: level_id.into(),
            parent_entity_id: None,
            payload: Value::Null,
        }
    }

    pub fn new_with_parent(
        id: impl Into<String>,
        level_id: impl Into<String>,
        parent_entity_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            level_id: level_id.into(),
            parent_entity_id: Some(parent_entity_id.into()),
            payload: Value::Null,
        }
    }
}

// ============================================================================
// Override Settings
// ============================================================================

/// The configurable dimensions the console manages per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideDimension {
    SlotRolling,
    CasinoRolling,
    Losing,
    SlotVoidBetting,
    CasinoVoidBetting,
}

impl OverrideDimension {
    pub const ALL: [Self; 5] = [
        Self::SlotRolling,
        Self::CasinoRolling,
        Self::Losing,
        Self::SlotVoidBetting,
        Self::CasinoVoidBetting,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::SlotRolling => "slot_rolling",
            Self::CasinoRolling => "casino_rolling",
            Self::Losing => "losing",
            Self::SlotVoidBetting => "slot_void_betting",
            Self::CasinoVoidBetting => "casino_void_betting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideMode {
    Individual,
    Group,
}

/// One operator-authored override for a `(node, dimension)` pair. Leaf fields
/// are optional so an unset field is distinguishable from an explicit value;
/// the distinction drives the `inherit_settings` merge during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSetting {
    pub enabled: bool,
    pub mode: OverrideMode,
    pub percentage: Option<f64>,
    pub min_bet_amount: Option<i64>,
    pub only_losing_bets: Option<bool>,
    /// Group cascade reach in entity-tree hops. Clamped to
    /// `[MIN_GROUP_CASCADE_DEPTH, MAX_GROUP_CASCADE_DEPTH]` on read.
    pub max_depth: u32,
    /// Group mode only: unset leaf fields fall back to the target node's own
    /// stored values instead of the compiled-in defaults.
    pub inherit_settings: bool,
}

impl Default for OverrideSetting {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: OverrideMode::Individual,
            percentage: None,
            min_bet_amount: None,
            only_losing_bets: None,
            max_depth: MIN_GROUP_CASCADE_DEPTH,
            inherit_settings: false,
        }
    }
}

impl OverrideSetting {
    /// An enabled individual override with the given percentage.
    pub fn individual(percentage: f64) -> Self {
        Self {
            enabled: true,
            mode: OverrideMode::Individual,
            percentage: Some(percentage),
            ..Self::default()
        }
    }

    /// An enabled group override cascading `max_depth` hops down.
    pub fn group(percentage: f64, max_depth: u32) -> Self {
        Self {
            enabled: true,
            mode: OverrideMode::Group,
            percentage: Some(percentage),
            max_depth,
            ..Self::default()
        }
    }

    /// Clamp stored values into their legal ranges. Storage written by older
    /// schema versions may hold out-of-range values; the resolver re-clamps
    /// on read and reports the correction as a diagnostic.
    pub fn sanitized(mut self) -> Self {
        self.max_depth = self
            .max_depth
            .clamp(MIN_GROUP_CASCADE_DEPTH, MAX_GROUP_CASCADE_DEPTH);
        if let Some(percentage) = self.percentage {
            self.percentage = Some(percentage.clamp(PERCENTAGE_MIN, PERCENTAGE_MAX));
        }
        self
    }
}
