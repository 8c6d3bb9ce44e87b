pub mod observer;
pub mod orchestrator;
pub mod session; // Session trait and PostgreSQL-protocol session factory

pub use observer::*;
pub use orchestrator::*;
pub use session::*;
