//! CLI commands module.

mod about;
mod attribution;
mod config;
mod generate;
mod session;
mod util;

pub use about::AboutCommand;
pub use attribution::AttributionCommand;
pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use session::SessionCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
