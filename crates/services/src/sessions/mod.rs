mod choices;
mod marathon;
mod progress;
mod single;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use choices::{marathon_choices, single_section_choices};
pub use marathon::MarathonSession;
pub use progress::SessionProgress;
pub use single::TestSession;
