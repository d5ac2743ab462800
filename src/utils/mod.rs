pub mod env_vars;
pub mod filesystem;

pub use env_vars::*;
pub use filesystem::*;
