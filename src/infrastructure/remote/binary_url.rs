use crate::core::request::InstallRequest;
use crate::infrastructure::remote::platform::Platform;

/// 目录服务只提供 JDK 镜像
const IMAGE_TYPE: &str = "jdk";
const VENDOR: &str = "adoptopenjdk";

/// 构造二进制下载地址。
///
/// `release == "latest"` 时按特性版本查找最新包，否则按 release 名称精确查找，
/// 此时 release 名称会被百分号编码。
pub fn binary_url(base_url: &str, request: &InstallRequest, platform: Platform) -> String {
    let base = base_url.trim_end_matches('/');
    let tail = format!(
        "{}/{}/{}/{}/{}/{}",
        platform.as_str(),
        request.architecture(),
        IMAGE_TYPE,
        request.implementation(),
        request.heap_size(),
        VENDOR
    );

    if request.is_latest() {
        format!(
            "{base}/binary/latest/{}/{}/{tail}",
            request.feature_version(),
            request.release_type()
        )
    } else {
        format!(
            "{base}/binary/version/{}/{tail}",
            urlencoding::encode(request.release())
        )
    }
}
