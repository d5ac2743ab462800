pub mod binary_url;
pub mod download;
pub mod platform;

pub use binary_url::binary_url;
pub use download::{retry, Fetcher, HttpFetcher, RetryPolicy};
pub use platform::Platform;
