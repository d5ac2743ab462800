// 核心模块
pub mod cli;
pub mod core;
pub mod error;
pub mod infrastructure;
pub mod utils;

// 重新导出常用类型
pub use crate::error::{AppError, AppResult};
pub use crate::core::cache_key::version_spec;
pub use crate::core::installer::{Installation, JdkInstaller};
pub use crate::core::request::{InstallRequest, RawInputs, ReleaseType};
// 使用命名空间导入常量，避免冲突
pub use crate::core::constants as app_constants;

pub use crate::infrastructure::config::{DownloadConfig, Settings};
pub use crate::infrastructure::installer::{Compression, PackUnpacker, ProcessUnpacker, ToolCache};
pub use crate::infrastructure::remote::{binary_url, retry, Fetcher, HttpFetcher, Platform, RetryPolicy};
pub use crate::infrastructure::shell::{publish, EnvSink, GithubActionsSink, ProcessEnvSink};
