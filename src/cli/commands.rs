use clap::Parser;
use crate::core::request::RawInputs;

/// install-jdk CLI 应用程序
///
/// 每个参数都可以通过对应的 CI 输入变量提供，空值视为未设置。
#[derive(Parser, Debug, Default)]
#[command(name = "install-jdk")]
#[command(about = "下载、缓存并导出指定版本的 JDK", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Java 特性版本，如 11 或 openjdk11
    #[arg(long, env = "INPUT_JAVA-VERSION")]
    pub java_version: Option<String>,

    /// 发布类型：ga / ea（别名 releases / nightly）
    #[arg(long, env = "INPUT_RELEASE-TYPE")]
    pub release_type: Option<String>,

    /// JVM 实现，如 hotspot
    #[arg(long, env = "INPUT_OPENJDK-IMPL")]
    pub openjdk_impl: Option<String>,

    /// 架构，如 x64
    #[arg(long, env = "INPUT_ARCHITECTURE")]
    pub architecture: Option<String>,

    /// 堆大小分类：normal / large
    #[arg(long, env = "INPUT_HEAP-SIZE")]
    pub heap_size: Option<String>,

    /// latest 或具体的 release 名称
    #[arg(long, env = "INPUT_RELEASE")]
    pub release: Option<String>,

    /// JSON 格式输出安装结果
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// 转换为安装请求的原始输入
    pub fn inputs(&self) -> RawInputs {
        RawInputs {
            java_version: self.java_version.clone(),
            release_type: self.release_type.clone(),
            implementation: self.openjdk_impl.clone(),
            architecture: self.architecture.clone(),
            heap_size: self.heap_size.clone(),
            release: self.release.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "install-jdk",
            "--java-version",
            "11",
            "--release-type",
            "nightly",
            "--openjdk-impl",
            "openj9",
            "--release",
            "jdk-11.0.2+9",
            "--json",
        ])
        .unwrap();

        let inputs = cli.inputs();
        assert_eq!(inputs.java_version.as_deref(), Some("11"));
        assert_eq!(inputs.release_type.as_deref(), Some("nightly"));
        assert_eq!(inputs.implementation.as_deref(), Some("openj9"));
        assert_eq!(inputs.release.as_deref(), Some("jdk-11.0.2+9"));
        assert!(cli.json);
    }
}
