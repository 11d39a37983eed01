mod bin;
mod psu;

pub use bin::*;
pub use psu::*;
