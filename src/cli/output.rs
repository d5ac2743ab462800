use crate::core::installer::Installation;
use crate::error::{AppError, AppResult};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// 输出格式化器
pub struct OutputFormatter;

impl OutputFormatter {
    /// 格式化安装结果
    pub fn format_installation(
        &self,
        installation: &Installation,
        format: OutputFormat,
    ) -> AppResult<String> {
        match format {
            OutputFormat::Text => {
                let source = if installation.from_cache {
                    "缓存"
                } else {
                    "下载"
                };
                Ok(format!(
                    "Java 已就绪 ({source}): {}\n{}={}\n{}={}\n",
                    installation.path.display(),
                    installation.env.home_var,
                    installation.env.home,
                    installation.env.qualified_home_var,
                    installation.env.home,
                ))
            }
            OutputFormat::Json => serde_json::to_string_pretty(installation)
                .map(|json| format!("{json}\n"))
                .map_err(|e| AppError::publish(format!("序列化安装结果失败: {e}"))),
        }
    }

    /// CI 问题匹配器注册命令
    pub fn add_matcher(&self, path: &str) -> String {
        format!("::add-matcher::{path}\n")
    }

    /// CI 错误注解，多行消息按工作流命令规则转义
    pub fn format_error(&self, error: &str) -> String {
        let escaped = error
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");
        format!("::error::{escaped}\n")
    }
}

/// 默认输出格式化器实例
pub static FORMATTER: OutputFormatter = OutputFormatter;
