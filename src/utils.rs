mod commands;
mod paths;
mod strings;

pub use commands::*;
pub use paths::*;
pub use strings::*;
