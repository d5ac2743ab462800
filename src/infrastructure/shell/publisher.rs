use crate::core::constants::env;
use crate::error::{AppError, AppResult};
use crate::infrastructure::remote::platform::Platform;
use crate::utils::EnvVarUtils;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// 环境变量的导出目标
pub trait EnvSink {
    /// 设置变量，重复设置以最后一次为准
    fn export_var(&mut self, name: &str, value: &str) -> AppResult<()>;
    /// 把目录放到可执行文件搜索路径最前面
    fn add_path(&mut self, dir: &str) -> AppResult<()>;
}

/// 只修改当前进程环境
#[derive(Debug, Clone)]
pub struct ProcessEnvSink {
    separator: char,
}

impl ProcessEnvSink {
    pub fn new(platform: Platform) -> Self {
        Self {
            separator: platform.path_separator(),
        }
    }
}

impl EnvSink for ProcessEnvSink {
    fn export_var(&mut self, name: &str, value: &str) -> AppResult<()> {
        std::env::set_var(name, value);
        Ok(())
    }

    fn add_path(&mut self, dir: &str) -> AppResult<()> {
        let path = EnvVarUtils::prepend_path(&EnvVarUtils::current_path(), dir, self.separator);
        std::env::set_var(env::PATH, path);
        Ok(())
    }
}

/// 通过 GitHub Actions 的环境文件把变量传给后续步骤，同时更新当前进程
#[derive(Debug, Clone)]
pub struct GithubActionsSink {
    env_file: PathBuf,
    path_file: PathBuf,
    process: ProcessEnvSink,
}

impl GithubActionsSink {
    pub fn new(env_file: PathBuf, path_file: PathBuf, platform: Platform) -> Self {
        Self {
            env_file,
            path_file,
            process: ProcessEnvSink::new(platform),
        }
    }

    /// `GITHUB_ENV` 与 `GITHUB_PATH` 都存在时才可用
    pub fn from_env(platform: Platform) -> Option<Self> {
        let env_file = std::env::var_os(env::GITHUB_ENV).filter(|v| !v.is_empty())?;
        let path_file = std::env::var_os(env::GITHUB_PATH).filter(|v| !v.is_empty())?;
        Some(Self::new(env_file.into(), path_file.into(), platform))
    }

    fn append(file: &Path, content: &str) -> AppResult<()> {
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .map_err(|e| AppError::publish(format!("打开 {} 失败: {}", file.display(), e)))?;
        handle
            .write_all(content.as_bytes())
            .map_err(|e| AppError::publish(format!("写入 {} 失败: {}", file.display(), e)))
    }
}

impl EnvSink for GithubActionsSink {
    fn export_var(&mut self, name: &str, value: &str) -> AppResult<()> {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        Self::append(
            &self.env_file,
            &format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"),
        )?;
        self.process.export_var(name, value)
    }

    fn add_path(&mut self, dir: &str) -> AppResult<()> {
        Self::append(&self.path_file, &format!("{dir}\n"))?;
        self.process.add_path(dir)
    }
}

/// 一次导出的三项结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedEnv {
    pub home_var: String,
    pub qualified_home_var: String,
    pub home: String,
    pub bin_dir: String,
}

/// 版本与架构限定的 home 变量名，如 `JAVA_HOME_11_X64`
pub fn qualified_home_var(version: &str, arch: &str) -> String {
    format!(
        "{}_{}_{}",
        env::JAVA_HOME,
        EnvVarUtils::sanitize_name(version),
        EnvVarUtils::sanitize_name(arch).to_uppercase()
    )
}

/// 导出安装目录：`JAVA_HOME`、版本限定的 home 变量，以及 `bin` 目录到 PATH
pub fn publish(
    sink: &mut dyn EnvSink,
    install_path: &Path,
    version: &str,
    arch: &str,
) -> AppResult<PublishedEnv> {
    let home = install_path.to_string_lossy().to_string();
    let bin_dir = install_path.join("bin").to_string_lossy().to_string();
    let qualified = qualified_home_var(version, arch);

    sink.export_var(env::JAVA_HOME, &home)?;
    sink.export_var(&qualified, &home)?;
    sink.add_path(&bin_dir)?;

    info!(java_home = %home, %qualified, "已导出 Java 环境");
    Ok(PublishedEnv {
        home_var: env::JAVA_HOME.to_string(),
        qualified_home_var: qualified,
        home,
        bin_dir,
    })
}
