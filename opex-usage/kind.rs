use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::DatasetError;

#[cfg(test)]
#[path = "./kind.tests.rs"]
mod kind_tests;

/// Resource the node usage datasets are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageKind {
    Cpu,
    Memory,
}

impl UsageKind {
    /// Returns name of the node and pod field that holds usage for this kind.
    pub fn usage_field(self) -> &'static str {
        match self {
            UsageKind::Cpu => "cpuUsage",
            UsageKind::Memory => "memUsage",
        }
    }

    /// Returns name of the node field that holds capacity for this kind.
    pub fn capacity_field(self) -> &'static str {
        match self {
            UsageKind::Cpu => "cpuCapacity",
            UsageKind::Memory => "memCapacity",
        }
    }
}

impl Display for UsageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageKind::Cpu => f.write_str("cpu"),
            UsageKind::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for UsageKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(UsageKind::Cpu),
            "mem" | "memory" => Ok(UsageKind::Memory),
            _ => Err(DatasetError::UnknownUsageKind(s.to_owned())),
        }
    }
}
