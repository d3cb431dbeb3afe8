mod command;
mod session;

pub use command::{Command, HELP};
pub use session::{ConsoleSession, DEFAULT_ADVANCE_DELAY};
