pub use self::client::{DataSource, TransportError, UsageClient};
pub use self::files::{DAILY_PERIOD, DataFile, MONTHLY_PERIOD};
pub use self::refresher::{BgRefresher, RefreshEvent, RefreshPayload, RefreshResult};

mod client;
mod files;
mod refresher;
