use serde::Serialize;
use std::fmt::Display;

#[cfg(test)]
#[path = "./files.tests.rs"]
mod files_tests;

/// Aggregation window of the daily usage files (14 days, in seconds).
pub const DAILY_PERIOD: u64 = 1_209_600;

/// Aggregation window of the monthly usage files (370 days, in seconds).
pub const MONTHLY_PERIOD: u64 = 31_968_000;

const USAGE_RATIO_LABEL: &str = "usage ratio (%)";

/// Data files published by the usage collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFile {
    Nodes,
    CpuTrends,
    MemoryTrends,
    CpuDaily,
    MemoryDaily,
    CpuMonthly,
    MemoryMonthly,
}

impl DataFile {
    /// All data files fetched in a single refresh cycle.
    pub const ALL: [DataFile; 7] = [
        DataFile::CpuTrends,
        DataFile::MemoryTrends,
        DataFile::CpuDaily,
        DataFile::MemoryDaily,
        DataFile::CpuMonthly,
        DataFile::MemoryMonthly,
        DataFile::Nodes,
    ];

    /// Returns name of the file relative to the data location.
    pub fn file_name(self) -> String {
        match self {
            DataFile::Nodes => "nodes.json".to_owned(),
            DataFile::CpuTrends => "cpu_usage_trends.json".to_owned(),
            DataFile::MemoryTrends => "memory_usage_trends.json".to_owned(),
            DataFile::CpuDaily => format!("cpu_usage_period_{DAILY_PERIOD}.json"),
            DataFile::MemoryDaily => format!("memory_usage_period_{DAILY_PERIOD}.json"),
            DataFile::CpuMonthly => format!("cpu_usage_period_{MONTHLY_PERIOD}.json"),
            DataFile::MemoryMonthly => format!("memory_usage_period_{MONTHLY_PERIOD}.json"),
        }
    }

    /// Returns title of the chart that shows this file.
    pub fn title(self) -> &'static str {
        match self {
            DataFile::Nodes => "Nodes usage",
            DataFile::CpuTrends | DataFile::MemoryTrends => "Namespace hourly usage",
            DataFile::CpuDaily => "Daily CPU Usage",
            DataFile::MemoryDaily => "Daily Memory Usage",
            DataFile::CpuMonthly => "Monthly CPU Usage",
            DataFile::MemoryMonthly => "Monthly Memory Usage",
        }
    }

    /// Returns Y axis label of the chart that shows this file.
    pub fn y_label(self) -> Option<&'static str> {
        match self {
            DataFile::Nodes => None,
            _ => Some(USAGE_RATIO_LABEL),
        }
    }
}

impl Display for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name())
    }
}
