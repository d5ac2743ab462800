use crate::core::constants::{download, env};
use crate::error::{AppError, AppResult};
use crate::infrastructure::remote::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 下载配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// 首次尝试之后的重试次数
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// 重试间隔（毫秒）
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// 每次失败后间隔翻倍
    #[serde(default)]
    pub exponential_backoff: bool,
    #[serde(default = "default_connect_timeout_sec")]
    pub connect_timeout_sec: u64,
    #[serde(default = "default_read_timeout_sec")]
    pub read_timeout_sec: u64,
}

fn default_retry_count() -> u32 {
    download::DEFAULT_RETRY_COUNT
}

fn default_retry_delay_ms() -> u64 {
    download::DEFAULT_RETRY_DELAY_MS
}

fn default_connect_timeout_sec() -> u64 {
    download::DEFAULT_CONNECT_TIMEOUT_SEC
}

fn default_read_timeout_sec() -> u64 {
    download::DEFAULT_READ_TIMEOUT_SEC
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            exponential_backoff: false,
            connect_timeout_sec: default_connect_timeout_sec(),
            read_timeout_sec: default_read_timeout_sec(),
        }
    }
}

/// 配置文件结构
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub download: DownloadConfig,
}

impl ConfigFile {
    /// 从 TOML 文件加载配置
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            AppError::config(format!("解析配置文件 {} 失败: {}", path.display(), e))
        })
    }
}

/// 进程启动时解析一次的运行配置，按值传入安装流程
#[derive(Debug, Clone)]
pub struct Settings {
    pub platform: Platform,
    pub temp_root: PathBuf,
    pub cache_root: PathBuf,
    pub api_base_url: String,
    pub download: DownloadConfig,
}

impl Settings {
    /// 从进程环境解析配置
    pub fn from_env() -> AppResult<Self> {
        Self::resolve(Platform::current(), |key| std::env::var(key).ok())
    }

    /// 使用给定的变量查找函数解析配置，测试中无需修改进程环境
    pub fn resolve<F>(platform: Platform, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let file = match get(env::CONFIG_FILE) {
            Some(path) => ConfigFile::load(Path::new(&path))?,
            None => ConfigFile::default(),
        };

        let temp_root = match get(env::RUNNER_TEMP) {
            Some(dir) => PathBuf::from(dir),
            None => default_runner_dir("temp")?,
        };

        let cache_root = match get(env::RUNNER_TOOL_CACHE) {
            Some(dir) => PathBuf::from(dir),
            None => default_runner_dir("tool-cache")?,
        };

        let api_base_url = get(env::API_URL)
            .or(file.api_base_url)
            .unwrap_or_else(|| download::DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            platform,
            temp_root,
            cache_root,
            api_base_url,
            download: file.download,
        })
    }
}

/// 未设置覆盖变量时使用 `<home>/actions/<name>`
fn default_runner_dir(name: &str) -> AppResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| AppError::config("无法获取用户主目录"))?;
    Ok(home_dir.join("actions").join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::resolve(
            Platform::Linux,
            lookup_from(&[
                ("RUNNER_TEMP", "/runner/temp"),
                ("RUNNER_TOOL_CACHE", "/runner/cache"),
                ("INSTALL_JDK_API_URL", "http://localhost:8080/v3"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.platform, Platform::Linux);
        assert_eq!(settings.temp_root, PathBuf::from("/runner/temp"));
        assert_eq!(settings.cache_root, PathBuf::from("/runner/cache"));
        assert_eq!(settings.api_base_url, "http://localhost:8080/v3");
        assert_eq!(settings.download, DownloadConfig::default());
    }

    #[test]
    fn test_download_defaults() {
        let config = DownloadConfig::default();
        assert_eq!(config.retry_count, 10);
        assert_eq!(config.retry_delay_ms, 1000);
        assert!(!config.exponential_backoff);
    }

    #[test]
    fn test_config_file_overrides_download_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_base_url = \"https://mirror.example/v3\"\n\n[download]\nretry_count = 2\nexponential_backoff = true\n",
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();

        let settings = Settings::resolve(
            Platform::Mac,
            lookup_from(&[
                ("INSTALL_JDK_CONFIG", path_str.as_str()),
                ("RUNNER_TEMP", "/t"),
                ("RUNNER_TOOL_CACHE", "/c"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.api_base_url, "https://mirror.example/v3");
        assert_eq!(settings.download.retry_count, 2);
        assert_eq!(settings.download.retry_delay_ms, 1000);
        assert!(settings.download.exponential_backoff);
    }

    #[test]
    fn test_broken_config_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[download\nretry_count = ").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let err = Settings::resolve(
            Platform::Linux,
            lookup_from(&[("INSTALL_JDK_CONFIG", path_str.as_str())]),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
