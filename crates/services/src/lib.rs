#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod events;
pub mod logging;
pub mod quiz_manager;
pub mod sessions;

pub use quiz_core::Clock;

pub use catalog::SectionCatalog;
pub use error::{CatalogError, QuizError, SessionError};
pub use events::{EventBus, EventReceiver, QuizEvent, drain};
pub use logging::LogContext;
pub use quiz_manager::{MarathonAdvance, QuizManager};
pub use sessions::{MarathonSession, SessionProgress, TestSession};
