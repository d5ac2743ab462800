use crate::cli::commands::Cli;
use crate::cli::output::{OutputFormat, FORMATTER};
use crate::core::constants::matcher::{PROBLEM_MATCHER_FILE, PROBLEM_MATCHER_JSON};
use crate::core::installer::JdkInstaller;
use crate::core::request::InstallRequest;
use crate::error::AppResult;
use crate::infrastructure::config::Settings;
use crate::infrastructure::installer::ProcessUnpacker;
use crate::infrastructure::remote::HttpFetcher;
use crate::infrastructure::shell::{EnvSink, GithubActionsSink, ProcessEnvSink};
use std::fs;
use std::path::PathBuf;

/// 命令处理器
pub struct CommandHandler {
    settings: Settings,
}

impl CommandHandler {
    /// 在启动时解析一次运行配置
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            settings: Settings::from_env()?,
        })
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }

    /// 把内嵌的问题匹配器写到临时目录，返回其路径
    pub fn write_problem_matcher(&self) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.settings.temp_root)?;
        let path = self.settings.temp_root.join(PROBLEM_MATCHER_FILE);
        fs::write(&path, PROBLEM_MATCHER_JSON)?;
        Ok(path)
    }

    /// 处理命令
    pub async fn handle(&self, cli: Cli) -> AppResult<()> {
        // 输入不完整时不做任何下载
        let request = InstallRequest::from_inputs(cli.inputs())?;

        let matcher = self.write_problem_matcher()?;
        print!("{}", FORMATTER.add_matcher(&matcher.display().to_string()));

        let fetcher = HttpFetcher::new(&self.settings.download)?.with_progress(!cli.json);
        let installer = JdkInstaller::new(self.settings.clone(), fetcher, ProcessUnpacker);

        let platform = self.settings.platform;
        let mut sink: Box<dyn EnvSink> = match GithubActionsSink::from_env(platform) {
            Some(sink) => Box::new(sink),
            None => Box::new(ProcessEnvSink::new(platform)),
        };

        let installation = installer.install(&request, sink.as_mut()).await?;
        let output =
            FORMATTER.format_installation(&installation, OutputFormat::from_flag(cli.json))?;
        print!("{output}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::infrastructure::config::DownloadConfig;
    use crate::infrastructure::remote::Platform;

    fn handler_in(root: &std::path::Path) -> CommandHandler {
        CommandHandler::with_settings(Settings {
            platform: Platform::Linux,
            temp_root: root.join("temp"),
            cache_root: root.join("cache"),
            api_base_url: "http://127.0.0.1:9".to_string(),
            download: DownloadConfig::default(),
        })
    }

    #[tokio::test]
    async fn test_missing_version_fails_before_download() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler_in(dir.path());

        let cli = Cli {
            java_version: Some(String::new()),
            ..Cli::default()
        };
        let err = handler.handle(cli).await.unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(!dir.path().join("temp").exists());
    }

    #[test]
    fn test_problem_matcher_is_written_to_temp_root() {
        let dir = tempfile::tempdir().unwrap();
        let handler = handler_in(dir.path());

        let path = handler.write_problem_matcher().unwrap();
        assert!(path.starts_with(dir.path().join("temp")));
        assert_eq!(fs::read_to_string(&path).unwrap(), PROBLEM_MATCHER_JSON);

        let matcher: serde_json::Value = serde_json::from_str(PROBLEM_MATCHER_JSON).unwrap();
        assert_eq!(matcher["problemMatcher"][0]["owner"], "java");

        // 重复运行覆盖同一个文件
        assert_eq!(handler.write_problem_matcher().unwrap(), path);
    }
}
