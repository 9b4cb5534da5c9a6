pub use self::tracker::StateChangeTracker;
pub use self::utils::*;

pub mod logging;
pub mod tasks;

mod tracker;
mod utils;
