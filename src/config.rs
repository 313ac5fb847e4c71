//! Store configuration.
//!
//! Structural knobs only: which columns a new board is seeded with and the
//! bound on entity name length. Display-text rules (markdown limits, emoji
//! policy) belong to the external validation collaborator, not here.

use crate::types::{COLUMN_DONE, COLUMN_IN_PROGRESS, COLUMN_TODO};
use serde::{Deserialize, Serialize};

/// Upper bound on board/task/subtask/user names, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 100;

/// A column seeded onto every newly created board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedColumn {
    /// Fixed column id. The canonical seeds use `todo`/`inprogress`/`done`
    /// so legacy status sync keeps working.
    pub id: String,
    pub name: String,
}

/// Configuration for a store instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Columns seeded when `CreateBoardRequest.columns` is omitted.
    #[serde(default = "default_seed_columns")]
    pub seed_columns: Vec<SeedColumn>,

    /// Maximum name length accepted by the store (characters).
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_columns: default_seed_columns(),
            max_name_len: default_max_name_len(),
        }
    }
}

impl StoreConfig {
    /// Parse a config from YAML, as shipped in the host bot's config tier.
    pub fn from_yaml(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}

fn default_seed_columns() -> Vec<SeedColumn> {
    vec![
        SeedColumn {
            id: COLUMN_TODO.to_string(),
            name: "To Do".to_string(),
        },
        SeedColumn {
            id: COLUMN_IN_PROGRESS.to_string(),
            name: "In Progress".to_string(),
        },
        SeedColumn {
            id: COLUMN_DONE.to_string(),
            name: "Done".to_string(),
        },
    ]
}

fn default_max_name_len() -> usize {
    DEFAULT_MAX_NAME_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_seeds_three_canonical_columns() {
        let config = StoreConfig::default();
        let ids: Vec<&str> = config.seed_columns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["todo", "inprogress", "done"]);
    }

    #[test]
    fn yaml_overrides_merge_with_defaults() {
        let config = StoreConfig::from_yaml("max_name_len: 40\n").unwrap();
        assert_eq!(config.max_name_len, 40);
        assert_eq!(config.seed_columns.len(), 3);
    }
}
