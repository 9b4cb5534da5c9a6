pub use self::app::*;
pub use self::output::*;
pub use self::state::*;

mod app;
mod output;
mod state;
