use rstest::rstest;

use super::*;

#[rstest]
#[case("cpu", UsageKind::Cpu)]
#[case("CPU", UsageKind::Cpu)]
#[case("mem", UsageKind::Memory)]
#[case(" Memory ", UsageKind::Memory)]
fn from_str_test(#[case] text: &str, #[case] expected: UsageKind) {
    assert_eq!(expected, UsageKind::from_str(text).unwrap());
}

#[test]
fn from_str_unknown_test() {
    assert_eq!(
        Err(DatasetError::UnknownUsageKind("disk".to_owned())),
        UsageKind::from_str("disk")
    );
}

#[test]
fn display_round_trips_test() {
    assert_eq!(UsageKind::Cpu, UsageKind::Cpu.to_string().parse::<UsageKind>().unwrap());
    assert_eq!(UsageKind::Memory, UsageKind::Memory.to_string().parse::<UsageKind>().unwrap());
}
