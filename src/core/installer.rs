use crate::core::cache_key::version_spec;
use crate::core::constants::cache::TOOL_NAME;
use crate::core::request::InstallRequest;
use crate::error::AppResult;
use crate::infrastructure::config::Settings;
use crate::infrastructure::installer::{archive, normalizer, PackUnpacker, ToolCache};
use crate::infrastructure::remote::{binary_url, retry, Fetcher, RetryPolicy};
use crate::infrastructure::shell::{publish, EnvSink, PublishedEnv};
use crate::utils::FileSystemUtils;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 一次安装的结果
#[derive(Debug, Clone, Serialize)]
pub struct Installation {
    pub path: PathBuf,
    pub version_spec: String,
    pub from_cache: bool,
    pub env: PublishedEnv,
}

/// JDK 安装流程：解析 → 查缓存 →（未命中）下载 → 解压 → 整理 → 写缓存 → 导出环境
pub struct JdkInstaller<F, U> {
    settings: Settings,
    fetcher: F,
    unpacker: U,
    cache: ToolCache,
}

impl<F, U> JdkInstaller<F, U>
where
    F: Fetcher,
    U: PackUnpacker,
{
    pub fn new(settings: Settings, fetcher: F, unpacker: U) -> Self {
        let cache = ToolCache::new(settings.cache_root.clone());
        Self {
            settings,
            fetcher,
            unpacker,
            cache,
        }
    }

    /// 安装并导出请求的 JDK
    pub async fn install(
        &self,
        request: &InstallRequest,
        sink: &mut dyn EnvSink,
    ) -> AppResult<Installation> {
        let spec = version_spec(request);
        let arch = request.architecture();
        info!(version = request.feature_version(), %spec, arch, "准备安装 Java");

        let (path, from_cache) = match self.cache.find(TOOL_NAME, &spec, arch) {
            Some(path) => {
                info!(path = %path.display(), "使用缓存中的 Java");
                (path, true)
            }
            None => (self.download_and_cache(request, &spec).await?, false),
        };

        let env = publish(sink, &path, request.requested_version(), arch)?;
        Ok(Installation {
            path,
            version_spec: spec,
            from_cache,
            env,
        })
    }

    async fn download_and_cache(&self, request: &InstallRequest, spec: &str) -> AppResult<PathBuf> {
        let platform = self.settings.platform;
        let url = binary_url(&self.settings.api_base_url, request, platform);
        let extension = platform.archive_ext();

        fs::create_dir_all(&self.settings.temp_root)?;
        let scratch_id = Uuid::new_v4().to_string();
        let archive_path = self
            .settings
            .temp_root
            .join(format!("{scratch_id}.{extension}"));
        let extract_dir = self.settings.temp_root.join(&scratch_id);

        let result = self
            .fetch_extract_store(&url, &archive_path, extension, &extract_dir, request, spec)
            .await;
        cleanup(&archive_path, &extract_dir);
        result
    }

    async fn fetch_extract_store(
        &self,
        url: &str,
        archive_path: &Path,
        extension: &str,
        extract_dir: &Path,
        request: &InstallRequest,
        spec: &str,
    ) -> AppResult<PathBuf> {
        info!(%url, "下载 Java");
        let policy = RetryPolicy::from_config(&self.settings.download);
        retry(&policy, || self.fetcher.fetch(url, archive_path)).await?;

        archive::extract(archive_path, extension, extract_dir)?;

        let platform = self.settings.platform;
        let install_root = normalizer::locate_install_root(extract_dir, platform)?;
        let unpacked = normalizer::expand_pack_files(&install_root, platform, &self.unpacker)?;
        debug!(unpacked, root = %install_root.display(), "安装目录整理完成");

        self.cache
            .store(&install_root, TOOL_NAME, spec, request.architecture())
    }
}

/// 清理下载文件和解压目录，失败只记录
fn cleanup(archive_path: &Path, extract_dir: &Path) {
    if let Err(e) = FileSystemUtils::remove_file(archive_path) {
        warn!(path = %archive_path.display(), "清理下载文件失败: {e}");
    }
    if let Err(e) = FileSystemUtils::remove_dir_all(extract_dir) {
        warn!(path = %extract_dir.display(), "清理解压目录失败: {e}");
    }
}
