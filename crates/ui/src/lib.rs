pub mod console;
pub mod vm;

pub use console::{Command, ConsoleSession};
pub use vm::RunMode;
