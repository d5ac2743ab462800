use std::env;

/// 环境变量工具
pub struct EnvVarUtils;

impl EnvVarUtils {
    /// 把 `dir` 放到 PATH 值的最前面；已存在的同名项会被移到最前，保证重复调用结果不变
    pub fn prepend_path(current: &str, dir: &str, separator: char) -> String {
        let mut paths = vec![dir.to_string()];
        paths.extend(
            current
                .split(separator)
                .filter(|p| !p.is_empty() && *p != dir)
                .map(str::to_string),
        );
        paths.join(&separator.to_string())
    }

    /// 读取当前进程的 PATH
    pub fn current_path() -> String {
        env::var("PATH").unwrap_or_default()
    }

    /// 生成合法的环境变量名片段，非字母数字字符替换为 `_`
    pub fn sanitize_name(value: &str) -> String {
        value
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}
