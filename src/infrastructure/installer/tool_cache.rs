use crate::core::cache_key::escape_path_component;
use crate::core::constants::cache::COMPLETE_MARKER_SUFFIX;
use crate::error::{AppError, AppResult};
use crate::utils::FileSystemUtils;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 按 (工具名, 版本规格, 架构) 组织的本地工具缓存。
///
/// 目录结构为 `<root>/<tool>/<version_spec>/<arch>`，旁边的
/// `<arch>.complete` 标记表示该条目已完整写入。架构名按单级目录名转义。不提供跨进程锁，
/// 同一个键的并发写入以最后一次为准。
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_dir(&self, tool: &str, version_spec: &str, arch: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version_spec)
            .join(escape_path_component(arch))
    }

    fn marker_path(&self, tool: &str, version_spec: &str, arch: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version_spec)
            .join(format!("{}.{COMPLETE_MARKER_SUFFIX}", escape_path_component(arch)))
    }

    /// 查找已完成的缓存条目，只读
    pub fn find(&self, tool: &str, version_spec: &str, arch: &str) -> Option<PathBuf> {
        if tool.is_empty() || version_spec.is_empty() || arch.is_empty() {
            return None;
        }

        let dir = self.entry_dir(tool, version_spec, arch);
        let marker = self.marker_path(tool, version_spec, arch);
        if dir.is_dir() && marker.is_file() {
            debug!(path = %dir.display(), "命中工具缓存");
            Some(dir)
        } else {
            debug!(tool, version_spec, arch, "工具缓存未命中");
            None
        }
    }

    /// 把整理好的安装目录复制进缓存并写入完成标记，返回缓存中的路径
    pub fn store(
        &self,
        source_dir: &Path,
        tool: &str,
        version_spec: &str,
        arch: &str,
    ) -> AppResult<PathBuf> {
        if tool.is_empty() || version_spec.is_empty() || arch.is_empty() {
            return Err(AppError::cache("缓存键不能为空"));
        }
        if !source_dir.is_dir() {
            return Err(AppError::cache(format!(
                "源目录不存在: {}",
                source_dir.display()
            )));
        }

        let dest = self.entry_dir(tool, version_spec, arch);
        let marker = self.marker_path(tool, version_spec, arch);

        FileSystemUtils::remove_file(&marker)?;
        FileSystemUtils::remove_dir_all(&dest)?;
        FileSystemUtils::copy_dir_all(source_dir, &dest).map_err(|e| {
            AppError::cache(format!(
                "复制 {} 到 {} 失败: {}",
                source_dir.display(),
                dest.display(),
                e
            ))
        })?;
        fs::write(&marker, b"")?;

        info!(path = %dest.display(), "已写入工具缓存");
        Ok(dest)
    }
}
