use std::fmt;
use std::path::{Path, PathBuf};

/// 二进制目录服务识别的平台，统一 OS / 默认压缩格式 / 安装目录布局的判定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// 检测当前运行平台。除 Windows 和 macOS 外一律视为 linux。
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Linux
        }
    }

    /// URL 中使用的平台名
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
        }
    }

    /// 针对平台返回下载包的压缩格式。
    pub fn archive_ext(&self) -> &'static str {
        match self {
            Platform::Windows => "zip",
            _ => "tar.gz",
        }
    }

    /// 平台上的可执行文件名
    pub fn executable_name(&self, name: &str) -> String {
        match self {
            Platform::Windows => format!("{name}.exe"),
            _ => name.to_string(),
        }
    }

    /// PATH 分隔符
    pub fn path_separator(&self) -> char {
        match self {
            Platform::Windows => ';',
            _ => ':',
        }
    }

    /// 从解压出的顶层目录得到真正的安装根目录。
    ///
    /// macOS 的包是 bundle 结构，JDK 位于 `Contents/Home` 下。
    pub fn install_root(&self, top_level: &Path) -> PathBuf {
        match self {
            Platform::Mac => top_level.join("Contents").join("Home"),
            _ => top_level.to_path_buf(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
