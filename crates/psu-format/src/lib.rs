mod common;
pub mod util;
mod writer;

pub use chrono;
pub use common::*;
pub use writer::*;
