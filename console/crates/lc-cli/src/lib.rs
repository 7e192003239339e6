//! lc - live console client
//!
//! Attaches to one remote server's console, prints its output and forwards
//! typed lines as commands.

pub mod cli;
pub mod error;
pub mod input;
pub mod logger;
pub mod render;

pub use cli::{Cli, TOKEN_ENV};
pub use error::{CliError, Result};
pub use input::{HELP, InputCommand, parse_line};
pub use render::{render_event, render_metrics, render_snapshot};
