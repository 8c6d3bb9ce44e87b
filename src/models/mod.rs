pub mod catalog;
pub mod report;
pub mod statement;

pub use catalog::*;
pub use report::*;
pub use statement::*;
