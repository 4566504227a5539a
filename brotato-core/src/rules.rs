use serde::{Deserialize, Serialize};

/// What the host can tell us about the items a player has collected so far.
pub trait CollectionState {
    fn has(&self, item: &str, count: u32) -> bool;
}

/// Access rule attached to an entrance or used as the completion condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AccessRule {
    Always,
    HasItem { item: String, count: u32 },
}

impl AccessRule {
    pub fn has(item: impl Into<String>, count: u32) -> Self {
        if count == 0 {
            return AccessRule::Always;
        }
        AccessRule::HasItem {
            item: item.into(),
            count,
        }
    }

    pub fn evaluate(&self, state: &dyn CollectionState) -> bool {
        match self {
            AccessRule::Always => true,
            AccessRule::HasItem { item, count } => state.has(item, *count),
        }
    }
}
