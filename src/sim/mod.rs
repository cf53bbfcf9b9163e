//! Level state, parsing, level sources and the step driver.

pub mod event;
pub mod level;
pub mod parser;
pub mod source;
pub mod step;
