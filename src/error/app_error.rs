use std::io;
use std::path::Path;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    /// 单次下载失败，可由重试恢复
    #[error("网络错误: {message}")]
    Network { message: String },

    /// 重试预算耗尽
    #[error("已达到最大重试次数 (共尝试 {attempts} 次): {last}")]
    MaxRetries {
        attempts: u32,
        #[source]
        last: Box<AppError>,
    },

    #[error("未知的压缩格式: {extension}")]
    UnknownCompression { extension: String },

    #[error("解压失败: {path} 不存在")]
    ArchiveNotFound { path: String },

    #[error("解压失败: {path} 是一个目录")]
    ArchiveIsDirectory { path: String },

    #[error("解压错误: {message}")]
    Extraction { message: String },

    #[error("安装目录整理失败: {message}")]
    Normalization { message: String },

    #[error("工具缓存错误: {message}")]
    Cache { message: String },

    #[error("导出环境变量失败: {message}")]
    Publish { message: String },
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

/// 便捷的错误创建函数
impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    pub fn normalization(message: impl Into<String>) -> Self {
        Self::Normalization {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn publish(message: impl Into<String>) -> Self {
        Self::Publish {
            message: message.into(),
        }
    }

    pub fn archive_not_found(path: &Path) -> Self {
        Self::ArchiveNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn archive_is_directory(path: &Path) -> Self {
        Self::ArchiveIsDirectory {
            path: path.display().to_string(),
        }
    }
}
