use rstest::rstest;

use super::*;

#[test]
fn truncate_test() {
    assert_eq!("Hello", truncate("Hello world", 5));
    assert_eq!("Hello world", truncate("Hello world", 11));
    assert_eq!("Hello world", truncate("Hello world", 20));
    assert_eq!("zaż", truncate("zażółć", 3));
}

#[rstest]
#[case("", "", 25)]
#[case("nginx", "nginx", 25)]
#[case("exactly-twenty-five-chars", "exactly-twenty-five-chars", 25)]
#[case("coredns-5d78c9869d-abcde...", "coredns-5d78c9869d-abcdefghij", 27)]
#[case("kube-controller-manage...", "kube-controller-manager-control-plane", 25)]
#[case("ab...", "abcdefgh", 5)]
#[case("..", "abcdefgh", 2)]
fn truncate_with_ending_test(#[case] expected: &str, #[case] text: &str, #[case] max_chars: usize) {
    let truncated = truncate_with_ending(text, max_chars, "...");

    assert_eq!(expected, truncated);
    assert!(truncated.chars().count() <= max_chars);
}

#[test]
fn truncate_with_ending_multibyte_test() {
    assert_eq!("żółw-żółw-żółw-żółw-żó...", truncate_with_ending("żółw-żółw-żółw-żółw-żółw-żółw", 25, "..."));
}
