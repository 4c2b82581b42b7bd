//! Command and middleware handlers registered next to the flows.

mod echo;
mod help;
mod logging;

pub use echo::{EchoHandler, ECHO_USAGE};
pub use help::{HelpHandler, HELP_TEXT};
pub use logging::LoggingHandler;
