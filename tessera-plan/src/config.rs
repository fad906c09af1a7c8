use serde::Deserialize;
use tessera_result::{Error, Result};

fn default_inquery_partitions_limit() -> usize {
    12
}

/// Planner options, read from the `columnstore` configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// `columnstore.inquery-partitions-limit`: cap on the number of
    /// partition-key combinations a single query may enumerate. Above the
    /// cap the planner degrades to a filtered full scan, which keeps plan
    /// size bounded against the backend's split enumerator.
    #[serde(
        rename = "inquery-partitions-limit",
        default = "default_inquery_partitions_limit"
    )]
    pub inquery_partitions_limit: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            inquery_partitions_limit: default_inquery_partitions_limit(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.inquery_partitions_limit == 0 {
            return Err(Error::invalid_argument(
                "columnstore.inquery-partitions-limit must be positive",
            ));
        }
        Ok(())
    }
}
