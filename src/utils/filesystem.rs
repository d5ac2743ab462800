use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// 文件系统工具
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// 安全地删除目录及其内容
    pub fn remove_dir_all(path: &Path) -> Result<(), io::Error> {
        if path.exists() {
            fs::remove_dir_all(path)?;
        }
        Ok(())
    }

    /// 安全地删除文件
    pub fn remove_file(path: &Path) -> Result<(), io::Error> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// 递归复制目录，保留文件权限，符号链接按链接本身复制（unix）
    pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), io::Error> {
        fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src).min_depth(1) {
            let entry = entry.map_err(io::Error::other)?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(io::Error::other)?;
            let target = dst.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)?;
            } else if file_type.is_symlink() {
                Self::copy_symlink(entry.path(), &target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    fn copy_symlink(src: &Path, dst: &Path) -> Result<(), io::Error> {
        let link = fs::read_link(src)?;
        std::os::unix::fs::symlink(link, dst)
    }

    #[cfg(not(unix))]
    fn copy_symlink(src: &Path, dst: &Path) -> Result<(), io::Error> {
        fs::copy(src, dst).map(|_| ())
    }
}
