use super::*;

#[tokio::test]
async fn load_or_create_writes_defaults_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = Config::load_or_create_from(&path).await.unwrap();

    assert_eq!(Config::default(), config);
    assert!(path.exists());
    assert_eq!(config, Config::load(&path).await.unwrap());
}

#[tokio::test]
async fn load_partial_config_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, "usage_kind: memory\nrefresh_interval: 60\n").await.unwrap();

    let config = Config::load_or_create_from(&path).await.unwrap();

    assert_eq!("memory", config.usage_kind);
    assert_eq!(Duration::from_secs(60), config.refresh_interval());
    assert_eq!(default_data_url(), config.data_url);
    assert_eq!(None, config.output_dir);
}

#[tokio::test]
async fn load_invalid_config_falls_back_to_defaults_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, "refresh_interval: [not, a, number]\n").await.unwrap();

    let config = Config::load_or_create_from(&path).await.unwrap();

    assert_eq!(Config::default(), config);
}

#[test]
fn zero_durations_are_raised_test() {
    let config = Config {
        refresh_interval: 0,
        request_timeout: 0,
        ..Config::default()
    };

    assert_eq!(Duration::from_secs(1), config.refresh_interval());
    assert_eq!(Duration::from_secs(1), config.request_timeout());
}
