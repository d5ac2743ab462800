use crate::core::constants::pack::{JAR_EXTENSION, PACK_EXTENSION, UNPACK_TOOL};
use crate::error::{AppError, AppResult};
use crate::infrastructure::remote::platform::Platform;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// 在解压目录中定位安装根目录。
///
/// 压缩包应只包含一个顶层目录，这里取目录列表的第一项；macOS 上再进入
/// bundle 内的 `Contents/Home`。得到的目录必须包含 `bin`。
pub fn locate_install_root(extract_root: &Path, platform: Platform) -> AppResult<PathBuf> {
    let mut entries = fs::read_dir(extract_root)?;

    let first = entries
        .next()
        .transpose()?
        .ok_or_else(|| {
            AppError::normalization(format!("解压目录为空: {}", extract_root.display()))
        })?;

    let extra = entries.count();
    if extra > 0 {
        warn!(
            extract_root = %extract_root.display(),
            chosen = %first.path().display(),
            extra,
            "压缩包包含多个顶层项，使用第一项"
        );
    }

    let install_root = platform.install_root(&first.path());
    if !install_root.join("bin").is_dir() {
        return Err(AppError::normalization(format!(
            "未在 {} 中找到 bin 目录",
            install_root.display()
        )));
    }
    Ok(install_root)
}

/// 遍历安装目录，返回所有需要解包的 `.pack` 文件（按路径排序）
pub fn find_pack_files(install_root: &Path) -> AppResult<Vec<PathBuf>> {
    let mut packs = Vec::new();
    for entry in WalkDir::new(install_root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            AppError::normalization(format!("遍历 {} 失败: {}", install_root.display(), e))
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PACK_EXTENSION))
        {
            packs.push(path.to_path_buf());
        }
    }
    Ok(packs)
}

/// 解包后生成的同级 jar 路径
pub fn jar_path_for(pack_file: &Path) -> PathBuf {
    pack_file.with_extension(JAR_EXTENSION)
}

/// 执行单个 pack 文件的解包
pub trait PackUnpacker: Send + Sync {
    fn unpack(&self, tool: &Path, pack_file: &Path, jar_file: &Path) -> AppResult<()>;
}

/// 调用安装目录中的 unpack200 进程
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessUnpacker;

impl PackUnpacker for ProcessUnpacker {
    fn unpack(&self, tool: &Path, pack_file: &Path, jar_file: &Path) -> AppResult<()> {
        let output = Command::new(tool)
            .arg(pack_file)
            .arg(jar_file)
            .output()
            .map_err(|e| {
                AppError::normalization(format!("执行 {} 失败: {}", tool.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::normalization(format!(
                "解包 {} 失败: {}",
                pack_file.display(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// 把安装目录中的所有 `.pack` 文件解包为同级 `.jar`，原文件保留。返回处理的文件数。
pub fn expand_pack_files(
    install_root: &Path,
    platform: Platform,
    unpacker: &dyn PackUnpacker,
) -> AppResult<usize> {
    let packs = find_pack_files(install_root)?;
    if packs.is_empty() {
        return Ok(0);
    }

    let tool = install_root
        .join("bin")
        .join(platform.executable_name(UNPACK_TOOL));
    info!(count = packs.len(), tool = %tool.display(), "解包 pack 文件");

    for pack in &packs {
        let jar = jar_path_for(pack);
        debug!(pack = %pack.display(), jar = %jar.display(), "unpack200");
        unpacker.unpack(&tool, pack, &jar)?;
    }
    Ok(packs.len())
}
