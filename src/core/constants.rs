//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的默认值。

/// 安装请求的默认值
pub mod inputs {
    /// 默认发布类型
    pub const DEFAULT_RELEASE_TYPE: &str = "ga";
    /// 默认 JVM 实现
    pub const DEFAULT_IMPLEMENTATION: &str = "hotspot";
    /// 默认架构
    pub const DEFAULT_ARCHITECTURE: &str = "x64";
    /// 默认堆大小分类
    pub const DEFAULT_HEAP_SIZE: &str = "normal";
    /// 表示最新发布的 release 值
    pub const LATEST_RELEASE: &str = "latest";
    /// 版本号中会被去掉的前缀
    pub const OPENJDK_PREFIX: &str = "openjdk";
}

/// 下载相关常量
pub mod download {
    /// 首次尝试之后的默认重试次数
    pub const DEFAULT_RETRY_COUNT: u32 = 10;
    /// 默认重试间隔（毫秒）
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
    /// 默认连接超时（秒）
    pub const DEFAULT_CONNECT_TIMEOUT_SEC: u64 = 30;
    /// 默认读取超时（秒）
    pub const DEFAULT_READ_TIMEOUT_SEC: u64 = 300;
    /// 默认二进制目录服务地址
    pub const DEFAULT_API_BASE_URL: &str = "https://api.adoptopenjdk.net/v3";
    /// 请求使用的 User-Agent
    pub const USER_AGENT: &str = concat!("install-jdk/", env!("CARGO_PKG_VERSION"));
}

/// 工具缓存相关常量
pub mod cache {
    /// 缓存中的工具名
    pub const TOOL_NAME: &str = "Java";
    /// 缓存结构版本，修改后所有旧条目失效
    pub const SCHEMA_VERSION: &str = "1.0.0";
    /// 缓存条目完成标记的后缀
    pub const COMPLETE_MARKER_SUFFIX: &str = "complete";
}

/// 环境变量名
pub mod env {
    /// 临时目录覆盖
    pub const RUNNER_TEMP: &str = "RUNNER_TEMP";
    /// 工具缓存根目录覆盖
    pub const RUNNER_TOOL_CACHE: &str = "RUNNER_TOOL_CACHE";
    /// 二进制目录服务地址覆盖
    pub const API_URL: &str = "INSTALL_JDK_API_URL";
    /// 可选配置文件路径
    pub const CONFIG_FILE: &str = "INSTALL_JDK_CONFIG";
    /// GitHub Actions 环境文件
    pub const GITHUB_ENV: &str = "GITHUB_ENV";
    /// GitHub Actions PATH 文件
    pub const GITHUB_PATH: &str = "GITHUB_PATH";
    /// 主 home 变量
    pub const JAVA_HOME: &str = "JAVA_HOME";
    /// 可执行文件搜索路径
    pub const PATH: &str = "PATH";
}

/// 打包格式相关常量
pub mod pack {
    /// 旧版压缩类文件扩展名
    pub const PACK_EXTENSION: &str = "pack";
    /// 解包后生成文件的扩展名
    pub const JAR_EXTENSION: &str = "jar";
    /// 解包工具名（不含平台后缀）
    pub const UNPACK_TOOL: &str = "unpack200";
}

/// 问题匹配器，随二进制一起发布
pub mod matcher {
    /// 内嵌的匹配器内容
    pub const PROBLEM_MATCHER_JSON: &str = include_str!("../../matchers/java.json");
    /// 运行时写入临时目录时使用的文件名
    pub const PROBLEM_MATCHER_FILE: &str = "install-jdk-java-matcher.json";
}
