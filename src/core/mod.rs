pub mod cache_key;
pub mod constants;
pub mod installer;
pub mod request;

pub use cache_key::*;
pub use installer::*;
pub use request::*;
