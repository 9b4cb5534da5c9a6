use rstest::rstest;

use super::*;

#[rstest]
#[case(DataFile::Nodes, "nodes.json")]
#[case(DataFile::CpuTrends, "cpu_usage_trends.json")]
#[case(DataFile::MemoryTrends, "memory_usage_trends.json")]
#[case(DataFile::CpuDaily, "cpu_usage_period_1209600.json")]
#[case(DataFile::MemoryDaily, "memory_usage_period_1209600.json")]
#[case(DataFile::CpuMonthly, "cpu_usage_period_31968000.json")]
#[case(DataFile::MemoryMonthly, "memory_usage_period_31968000.json")]
fn file_name_test(#[case] file: DataFile, #[case] expected: &str) {
    assert_eq!(expected, file.file_name());
}

#[test]
fn periods_test() {
    assert_eq!(14 * 24 * 3600, DAILY_PERIOD);
    assert_eq!(370 * 24 * 3600, MONTHLY_PERIOD);
}

#[test]
fn all_files_are_distinct_test() {
    let mut files = DataFile::ALL.to_vec();
    files.sort();
    files.dedup();

    assert_eq!(DataFile::ALL.len(), files.len());
}
