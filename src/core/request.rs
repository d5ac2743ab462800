use crate::core::constants::inputs;
use crate::error::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// 发布渠道
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ReleaseType {
    /// 正式版
    Ga,
    /// 抢先体验版
    Ea,
    /// 未识别的值，原样传给目录服务
    Other(String),
}

impl ReleaseType {
    /// 解析发布类型，`releases` / `nightly` 是 `ga` / `ea` 的别名。
    pub fn parse(value: &str) -> Self {
        match value {
            "ga" | "releases" => ReleaseType::Ga,
            "ea" | "nightly" => ReleaseType::Ea,
            other => ReleaseType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReleaseType::Ga => "ga",
            ReleaseType::Ea => "ea",
            ReleaseType::Other(value) => value,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ReleaseType> for String {
    fn from(value: ReleaseType) -> Self {
        value.as_str().to_string()
    }
}

/// 去掉版本号中的 `openjdk` 前缀，其余原样保留。
pub fn normalize_feature_version(version: &str) -> &str {
    version
        .strip_prefix(inputs::OPENJDK_PREFIX)
        .unwrap_or(version)
}

/// 用户提供的原始输入，所有字段都可能缺失
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub java_version: Option<String>,
    pub release_type: Option<String>,
    pub implementation: Option<String>,
    pub architecture: Option<String>,
    pub heap_size: Option<String>,
    pub release: Option<String>,
}

/// 规范化后的安装请求，构造后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallRequest {
    release_type: ReleaseType,
    feature_version: String,
    requested_version: String,
    implementation: String,
    architecture: String,
    heap_size: String,
    release: String,
}

/// 空字符串与缺失等价（CI 对未设置的输入会给出空值）
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl InstallRequest {
    /// 从原始输入构造请求，缺少 java-version 时返回配置错误
    pub fn from_inputs(raw: RawInputs) -> AppResult<Self> {
        let requested_version = non_empty(raw.java_version)
            .ok_or_else(|| AppError::config("缺少必需的输入: java-version"))?;

        let release_type = non_empty(raw.release_type)
            .unwrap_or_else(|| inputs::DEFAULT_RELEASE_TYPE.to_string());

        Ok(Self {
            release_type: ReleaseType::parse(&release_type),
            feature_version: normalize_feature_version(&requested_version).to_string(),
            requested_version,
            implementation: non_empty(raw.implementation)
                .unwrap_or_else(|| inputs::DEFAULT_IMPLEMENTATION.to_string()),
            architecture: non_empty(raw.architecture)
                .unwrap_or_else(|| inputs::DEFAULT_ARCHITECTURE.to_string()),
            heap_size: non_empty(raw.heap_size)
                .unwrap_or_else(|| inputs::DEFAULT_HEAP_SIZE.to_string()),
            release: non_empty(raw.release).unwrap_or_else(|| inputs::LATEST_RELEASE.to_string()),
        })
    }

    pub fn release_type(&self) -> &ReleaseType {
        &self.release_type
    }

    pub fn feature_version(&self) -> &str {
        &self.feature_version
    }

    /// 用户原样输入的版本（未去前缀）
    pub fn requested_version(&self) -> &str {
        &self.requested_version
    }

    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn heap_size(&self) -> &str {
        &self.heap_size
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn is_latest(&self) -> bool {
        self.release == inputs::LATEST_RELEASE
    }
}
