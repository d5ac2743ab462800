pub mod archive;
pub mod normalizer;
pub mod tool_cache;

pub use archive::Compression;
pub use normalizer::{PackUnpacker, ProcessUnpacker};
pub use tool_cache::ToolCache;
