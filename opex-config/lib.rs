pub use self::config::{
    APP_NAME, APP_VERSION, Config, ConfigError, DEFAULT_REFRESH_INTERVAL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USAGE_KIND,
};
pub use self::watcher::{ConfigWatcher, Persistable};

mod config;
mod watcher;
