pub mod macros;
pub mod query;
pub mod schedule;
pub mod time;

pub use query::*;
pub use schedule::*;
pub use time::*;
