use crate::core::constants::cache::SCHEMA_VERSION;
use crate::core::request::InstallRequest;
use std::fmt::Write;

/// 转义单个字段，保证以 `-` 拼接后的结果可以无歧义地还原。
fn escape_component(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'+' => {
                escaped.push(byte as char)
            }
            _ => {
                let _ = write!(escaped, "%{byte:02X}");
            }
        }
    }
    escaped
}

/// 转义用作单级目录名的字段：分隔符被转义，`.`/`..` 也不会原样出现。
pub fn escape_path_component(value: &str) -> String {
    let escaped = escape_component(value);
    if escaped.bytes().all(|byte| byte == b'.') {
        escaped.replace('.', "%2E")
    } else {
        escaped
    }
}

/// 根据请求生成工具缓存使用的版本规格（不含架构）。
///
/// 形如 `1.0.0-ga-11-hotspot-normal-latest`。
pub fn version_spec(request: &InstallRequest) -> String {
    let fields = [
        request.release_type().as_str(),
        request.feature_version(),
        request.implementation(),
        request.heap_size(),
        request.release(),
    ];

    let mut spec = SCHEMA_VERSION.to_string();
    for field in fields {
        spec.push('-');
        spec.push_str(&escape_component(field));
    }
    spec
}
