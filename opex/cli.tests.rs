use super::*;

#[test]
fn apply_overrides_test() {
    let args = Args::parse_from(["opex", "--usage-kind", "memory", "-i", "60", "--data-url", "/srv/data"]);

    let config = args.apply(Config::default());

    assert_eq!("memory", config.usage_kind);
    assert_eq!(60, config.refresh_interval);
    assert_eq!("/srv/data", config.data_url);
    assert_eq!(None, config.output_dir);
}

#[test]
fn apply_keeps_config_values_test() {
    let config = Config {
        usage_kind: "memory".to_owned(),
        ..Config::default()
    };

    assert_eq!(config.clone(), Args::default().apply(config));
}
