use crate::error::{AppError, AppResult};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// 支持的压缩格式，按调用方声明的扩展名分发，不探测文件内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Tar,
    TarGz,
    Zip,
    SevenZip,
}

impl Compression {
    /// 解析扩展名，允许带前导 `.`
    pub fn from_extension(extension: &str) -> AppResult<Self> {
        match extension.trim_start_matches('.') {
            "tar" => Ok(Compression::Tar),
            "tar.gz" | "tgz" => Ok(Compression::TarGz),
            "zip" => Ok(Compression::Zip),
            "7z" => Ok(Compression::SevenZip),
            other => Err(AppError::UnknownCompression {
                extension: other.to_string(),
            }),
        }
    }
}

/// 把 `archive_path` 解压到 `dest_dir`，目标目录不存在时会被创建。
pub fn extract(archive_path: &Path, extension: &str, dest_dir: &Path) -> AppResult<()> {
    let metadata =
        fs::metadata(archive_path).map_err(|_| AppError::archive_not_found(archive_path))?;
    if metadata.is_dir() {
        return Err(AppError::archive_is_directory(archive_path));
    }

    let compression = Compression::from_extension(extension)?;
    fs::create_dir_all(dest_dir)?;

    debug!(
        archive = %archive_path.display(),
        dest = %dest_dir.display(),
        ?compression,
        "解压"
    );

    match compression {
        Compression::Tar => extract_tar(archive_path, dest_dir),
        Compression::TarGz => extract_tar_gz(archive_path, dest_dir),
        Compression::Zip => extract_zip(archive_path, dest_dir),
        Compression::SevenZip => extract_7z(archive_path, dest_dir),
    }
}

fn unpack_tar<R: Read>(reader: R, archive_path: &Path, dest_dir: &Path) -> AppResult<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(dest_dir).map_err(|e| {
        AppError::extraction(format!("解压 {} 失败: {}", archive_path.display(), e))
    })
}

fn extract_tar(archive_path: &Path, dest_dir: &Path) -> AppResult<()> {
    let file = fs::File::open(archive_path)?;
    unpack_tar(file, archive_path, dest_dir)
}

fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> AppResult<()> {
    let file = fs::File::open(archive_path)?;
    unpack_tar(GzDecoder::new(file), archive_path, dest_dir)
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> AppResult<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::extraction(format!("读取 ZIP 文件失败: {e}")))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| AppError::extraction(format!("读取 ZIP 文件项失败: {e}")))?;

        let relative = entry.enclosed_name().map(Path::to_path_buf).ok_or_else(|| {
            AppError::extraction(format!("ZIP 文件项路径非法: {}", entry.name()))
        })?;
        let outpath = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = fs::File::create(&outpath)?;
        std::io::copy(&mut entry, &mut outfile)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

/// 7z 没有纯 Rust 实现，交给系统中的 7z / 7za
fn extract_7z(archive_path: &Path, dest_dir: &Path) -> AppResult<()> {
    let tool = which::which("7z")
        .or_else(|_| which::which("7za"))
        .map_err(|_| AppError::extraction("未找到 7z 解压工具"))?;

    let output = Command::new(tool)
        .arg("x")
        .arg(archive_path)
        .arg(format!("-o{}", dest_dir.display()))
        .arg("-y")
        .output()
        .map_err(|e| AppError::extraction(format!("执行解压命令失败: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::extraction(format!("解压失败: {stderr}")));
    }
    Ok(())
}
