//! Cascading override storage and precedence resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{
    EntityId, OverrideDimension, OverrideMode, OverrideSetting, MAX_GROUP_CASCADE_DEPTH,
    PERCENTAGE_MAX, PERCENTAGE_MIN,
};

/// Operator-authored settings keyed by `(node, dimension)`. The store is
/// owned by the persistence collaborator; the engine only reads it during
/// resolution. Writes are an operator action mediated outside the engine,
/// one logical writer per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideStore {
    settings: BTreeMap<EntityId, BTreeMap<OverrideDimension, OverrideSetting>>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str, dimension: OverrideDimension) -> Option<&OverrideSetting> {
        self.settings
            .get(node_id)
            .and_then(|by_dimension| by_dimension.get(&dimension))
    }

    pub fn set(
        &mut self,
        node_id: impl Into<EntityId>,
        dimension: OverrideDimension,
        setting: OverrideSetting,
    ) {
        self.settings
            .entry(node_id.into())
            .or_default()
            .insert(dimension, setting);
    }

    pub fn remove(&mut self, node_id: &str, dimension: OverrideDimension) {
        if let Some(by_dimension) = self.settings.get_mut(node_id) {
            by_dimension.remove(&dimension);
            if by_dimension.is_empty() {
                self.settings.remove(node_id);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Fully resolved configuration for one `(node, dimension)` query. No
/// further merging is needed by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOverride {
    pub enabled: bool,
    pub percentage: f64,
    pub min_bet_amount: Option<i64>,
    pub only_losing_bets: bool,
}

impl Default for ResolvedOverride {
    fn default() -> Self {
        Self {
            enabled: false,
            percentage: 0.0,
            min_bet_amount: None,
            only_losing_bets: false,
        }
    }
}

/// Where the winning value came from, for the console's "effective rate"
/// detail popover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OverrideSource {
    Individual { node_id: EntityId },
    Group { ancestor_id: EntityId, hops: u32 },
    Default,
}

/// Read-time corrections of out-of-range stored values. Old schema versions
/// may have written them; the resolver clamps and reports instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OverrideDiagnostic {
    MaxDepthClamped {
        node_id: EntityId,
        dimension: OverrideDimension,
        stored: u32,
        clamped: u32,
    },
    PercentageClamped {
        node_id: EntityId,
        dimension: OverrideDimension,
        stored: f64,
        clamped: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideResolution {
    pub value: ResolvedOverride,
    pub source: OverrideSource,
    pub diagnostics: Vec<OverrideDiagnostic>,
}

/// Resolve the effective setting for one node and dimension.
///
/// Precedence, evaluated fresh per query:
/// 1. an enabled Individual setting on the node itself;
/// 2. the closest ancestor (entity-tree parent links, not level ancestry)
///    whose enabled Group setting reaches this hop distance;
/// 3. the compiled-in default.
///
/// The ancestor walk carries its own hop counter bounded by
/// `MAX_GROUP_CASCADE_DEPTH`, which also bounds walks over corrupted
/// (cyclic) parent chains.
pub fn resolve_override(
    store: &OverrideStore,
    parent_links: &BTreeMap<EntityId, EntityId>,
    node_id: &str,
    dimension: OverrideDimension,
) -> OverrideResolution {
    let mut diagnostics: Vec<OverrideDiagnostic> = Vec::new();

    let own = store.get(node_id, dimension);
    if let Some(setting) = own {
        if setting.mode == OverrideMode::Individual && setting.enabled {
            let value = ResolvedOverride {
                enabled: true,
                percentage: clamped_percentage(
                    setting.percentage,
                    node_id,
                    dimension,
                    &mut diagnostics,
                ),
                min_bet_amount: setting.min_bet_amount,
                only_losing_bets: setting.only_losing_bets.unwrap_or(false),
            };
            return OverrideResolution {
                value,
                source: OverrideSource::Individual {
                    node_id: node_id.to_string(),
                },
                diagnostics,
            };
        }
    }

    let mut current = node_id;
    for hop in 1..=MAX_GROUP_CASCADE_DEPTH {
        let Some(parent) = parent_links.get(current) else {
            break;
        };
        current = parent.as_str();

        let Some(setting) = store.get(current, dimension) else {
            continue;
        };
        if setting.mode != OverrideMode::Group || !setting.enabled {
            continue;
        }
        let reach = setting.sanitized_depth(current, dimension, &mut diagnostics);
        if hop > reach {
            // Out of range for this ancestor; a farther one may still apply.
            continue;
        }

        let value = group_value(setting, own, current, node_id, dimension, &mut diagnostics);
        return OverrideResolution {
            value,
            source: OverrideSource::Group {
                ancestor_id: current.to_string(),
                hops: hop,
            },
            diagnostics,
        };
    }

    OverrideResolution {
        value: ResolvedOverride::default(),
        source: OverrideSource::Default,
        diagnostics,
    }
}

impl OverrideSetting {
    /// Group reach with the read-time clamp applied and reported.
    fn sanitized_depth(
        &self,
        node_id: &str,
        dimension: OverrideDimension,
        diagnostics: &mut Vec<OverrideDiagnostic>,
    ) -> u32 {
        let clamped = self.clone().sanitized().max_depth;
        if clamped != self.max_depth {
            diagnostics.push(OverrideDiagnostic::MaxDepthClamped {
                node_id: node_id.to_string(),
                dimension,
                stored: self.max_depth,
                clamped,
            });
        }
        clamped
    }
}

/// Leaf fields for a winning Group setting. With `inherit_settings` unset
/// ancestor fields stay unset and fall through to the compiled-in defaults;
/// with it set they fall back to the target node's own stored setting first.
/// Explicitly-set ancestor values are never overridden either way.
fn group_value(
    winner: &OverrideSetting,
    own: Option<&OverrideSetting>,
    ancestor_id: &str,
    node_id: &str,
    dimension: OverrideDimension,
    diagnostics: &mut Vec<OverrideDiagnostic>,
) -> ResolvedOverride {
    let (percentage, percentage_owner) = match winner.percentage {
        Some(value) => (Some(value), ancestor_id),
        None if winner.inherit_settings => (own.and_then(|setting| setting.percentage), node_id),
        None => (None, ancestor_id),
    };
    let min_bet_amount = match winner.min_bet_amount {
        Some(value) => Some(value),
        None if winner.inherit_settings => own.and_then(|setting| setting.min_bet_amount),
        None => None,
    };
    let only_losing_bets = match winner.only_losing_bets {
        Some(value) => value,
        None if winner.inherit_settings => own
            .and_then(|setting| setting.only_losing_bets)
            .unwrap_or(false),
        None => false,
    };

    ResolvedOverride {
        enabled: true,
        percentage: clamped_percentage(percentage, percentage_owner, dimension, diagnostics),
        min_bet_amount,
        only_losing_bets,
    }
}

fn clamped_percentage(
    stored: Option<f64>,
    node_id: &str,
    dimension: OverrideDimension,
    diagnostics: &mut Vec<OverrideDiagnostic>,
) -> f64 {
    let Some(stored) = stored else {
        return 0.0;
    };
    let clamped = stored.clamp(PERCENTAGE_MIN, PERCENTAGE_MAX);
    if clamped != stored {
        diagnostics.push(OverrideDiagnostic::PercentageClamped {
            node_id: node_id.to_string(),
            dimension,
            stored,
            clamped,
        });
    }
    clamped
}
