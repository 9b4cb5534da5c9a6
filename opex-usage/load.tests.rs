use rstest::rstest;

use super::*;

#[rstest]
#[case(12.5, 25.0, 200.0)]
#[case(33.34, 1.0, 3.0)]
#[case(66.67, 2.0, 3.0)]
#[case(100.0, 3.0, 3.0)]
#[case(0.0, 0.0, 8.0)]
#[case(10.0, 10.0, 100.0)]
#[case(0.01, 1.0, 1_000_000.0)]
fn compute_load_test(#[case] expected: f64, #[case] used: f64, #[case] capacity: f64) {
    assert_eq!(expected, compute_load(used, capacity));
}

#[test]
fn compute_load_rounds_up_test() {
    for used in 0..=300 {
        let load = compute_load(f64::from(used), 300.0);
        assert!((0.0..=100.0).contains(&load));
        assert!(load >= f64::from(used) / 3.0);
    }
}

#[test]
fn compute_load_zero_capacity_test() {
    assert!(compute_load(5.0, 0.0).is_infinite());
    assert!(compute_load(0.0, 0.0).is_nan());
}

#[rstest]
#[case(0.0, "rgb(0,0,255)")]
#[case(-20.0, "rgb(0,0,255)")]
#[case(100.0, "rgb(255,0,0)")]
#[case(150.0, "rgb(255,0,0)")]
#[case(50.0, "rgb(127.5,255,0)")]
#[case(25.0, "rgb(0,191.25,63.75)")]
#[case(75.0, "rgb(255,191.25,0)")]
fn heat_map_color_test(#[case] load: f64, #[case] expected: &str) {
    assert_eq!(expected, heat_map_color(load).to_string());
}

#[test]
fn heat_map_color_midpoint_test() {
    let color = heat_map_color(50.0);
    let green = HEAT_MAP_STOPS[1];
    let yellow = HEAT_MAP_STOPS[2];

    assert_eq!((green.r + yellow.r) / 2.0, color.r);
    assert_eq!((green.g + yellow.g) / 2.0, color.g);
    assert_eq!((green.b + yellow.b) / 2.0, color.b);
}

#[test]
fn heat_map_color_nan_test() {
    assert_eq!(HEAT_MAP_STOPS[0], heat_map_color(f64::NAN));
}

#[test]
fn rounded_test() {
    assert_eq!((128, 255, 0), heat_map_color(50.0).rounded());
    assert_eq!((0, 191, 64), heat_map_color(25.0).rounded());
}

#[test]
fn serialize_test() {
    let json = serde_json::to_string(&[heat_map_color(0.0), heat_map_color(50.0)]).unwrap();
    assert_eq!(r#"["rgb(0,0,255)","rgb(127.5,255,0)"]"#, json);
}
