use crate::core::constants::download::USER_AGENT;
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::DownloadConfig;
use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{debug, warn};

/// 重试策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 首次尝试之后允许的重试次数
    pub retries: u32,
    pub delay_ms: u64,
    pub exponential_backoff: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DownloadConfig::default())
    }
}

impl RetryPolicy {
    /// 从配置创建重试策略
    pub fn from_config(config: &DownloadConfig) -> Self {
        Self {
            retries: config.retry_count,
            delay_ms: config.retry_delay_ms,
            exponential_backoff: config.exponential_backoff,
        }
    }

    /// 第 `failed_attempts` 次失败之后的等待时间（从 1 开始计数）
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        if self.exponential_backoff {
            let factor = 2_u64.saturating_pow(failed_attempts.saturating_sub(1));
            Duration::from_millis(self.delay_ms.saturating_mul(factor))
        } else {
            Duration::from_millis(self.delay_ms)
        }
    }
}

/// 按策略顺序重试异步操作。
///
/// 每次失败后记录警告并等待，两次尝试不会重叠。重试次数为 0 时只尝试一次并
/// 原样返回错误；预算耗尽时返回 [`AppError::MaxRetries`]。
pub async fn retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut failed_attempts = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        failed_attempts += 1;

        if policy.retries == 0 {
            return Err(err);
        }
        if failed_attempts > policy.retries {
            return Err(AppError::MaxRetries {
                attempts: failed_attempts,
                last: Box::new(err),
            });
        }

        let delay = policy.delay_after(failed_attempts);
        let delay_ms = delay.as_millis() as u64;
        warn!(
            attempt = failed_attempts,
            max_attempts = policy.retries.saturating_add(1),
            delay_ms,
            "下载出错: {err}，稍后重试"
        );
        tokio::time::sleep(delay).await;
    }
}

/// 单次下载，失败由调用方决定是否重试
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> AppResult<()>;
}

/// 基于 reqwest 的流式下载器。
///
/// `read_timeout` 是空闲超时：限制等待响应头和每个数据块的时间，
/// 不限制整个下载的总时长。
pub struct HttpFetcher {
    client: Client,
    read_timeout: Duration,
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new(config: &DownloadConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_sec))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::network(format!("创建 HTTP 客户端失败: {e}")))?;

        Ok(Self {
            client,
            read_timeout: Duration::from_secs(config.read_timeout_sec),
            show_progress: true,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn progress_bar(&self, total_size: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }

    fn timed_out(&self, what: &str, url: &str) -> AppError {
        AppError::network(format!(
            "{what}超时: {} 秒内未收到数据 (URL: {url})",
            self.read_timeout.as_secs()
        ))
    }

    /// 把响应写入临时文件，不做清理
    async fn download_to(&self, url: &str, temp_path: &Path) -> AppResult<()> {
        let response = timeout(self.read_timeout, self.client.get(url).send())
            .await
            .map_err(|_| self.timed_out("等待响应", url))?
            .map_err(|e| AppError::network(format!("网络请求失败: {e} (URL: {url})")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::network(format!(
                "服务器返回状态码: {status} (URL: {url})"
            )));
        }

        let pb = self.progress_bar(response.content_length().unwrap_or(0));
        let written = self.write_body(response, url, temp_path, &pb).await;
        match &written {
            Ok(()) => pb.finish_and_clear(),
            Err(_) => pb.abandon(),
        }
        written
    }

    async fn write_body(
        &self,
        response: Response,
        url: &str,
        temp_path: &Path,
        pb: &ProgressBar,
    ) -> AppResult<()> {
        let mut file = async_fs::File::create(temp_path).await?;
        let mut stream = response.bytes_stream();

        loop {
            let chunk = match timeout(self.read_timeout, stream.next()).await {
                Err(_) => return Err(self.timed_out("读取数据", url)),
                Ok(None) => break,
                Ok(Some(Err(e))) => {
                    return Err(AppError::network(format!("读取数据失败: {e}")));
                }
                Ok(Some(Ok(chunk))) => chunk,
            };
            file.write_all(&chunk).await?;
            pb.inc(chunk.len() as u64);
        }

        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> AppResult<()> {
        debug!(%url, dest = %dest.display(), "开始下载");

        let temp_path = dest.with_extension("downloading");
        let mut result = self.download_to(url, &temp_path).await;
        if result.is_ok() {
            result = async_fs::rename(&temp_path, dest).await.map_err(AppError::from);
        }

        // 任何失败都不留下半截文件
        if result.is_err() {
            if let Err(e) = async_fs::remove_file(&temp_path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %temp_path.display(), "清理临时下载文件失败: {e}");
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, TcpStream};

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            delay_ms: 1,
            exponential_backoff: false,
        }
    }

    /// 前 `failures` 次失败，之后成功
    async fn flaky(calls: &AtomicU32, failures: u32) -> AppResult<&'static str> {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= failures {
            Err(AppError::network(format!("第 {call} 次失败")))
        } else {
            Ok("done")
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_failures_within_budget() {
        let calls = AtomicU32::new(0);
        let result = retry(&policy(3), || flaky(&calls, 3)).await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_first_try_success_is_single_attempt() {
        let calls = AtomicU32::new(0);
        retry(&policy(10), || flaky(&calls, 0)).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_budget_reports_max_retries() {
        let calls = AtomicU32::new(0);
        let err = retry(&policy(2), || flaky(&calls, 5)).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            AppError::MaxRetries { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(last.to_string().contains("第 3 次失败"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_budget_propagates_original_error() {
        let calls = AtomicU32::new(0);
        let err = retry(&policy(0), || flaky(&calls, 1)).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, AppError::Network { .. }));
    }

    #[test]
    fn test_fixed_delay() {
        let policy = RetryPolicy {
            retries: 3,
            delay_ms: 1000,
            exponential_backoff: false,
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(1000));
    }

    #[test]
    fn test_exponential_delay_doubles() {
        let policy = RetryPolicy {
            retries: 5,
            delay_ms: 1000,
            exponential_backoff: true,
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(4), Duration::from_millis(8000));
    }

    #[test]
    fn test_default_policy_matches_download_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 10);
        assert_eq!(policy.delay_ms, 1000);
        assert!(!policy.exponential_backoff);
    }

    #[tokio::test]
    async fn test_largest_budget_logs_without_overflow() {
        let calls = AtomicU32::new(0);
        let result = retry(&policy(u32::MAX), || flaky(&calls, 1)).await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// 一个响应由若干 (等待毫秒, 字节) 片段组成，发完即关闭连接
    type Reply = Vec<(u64, Vec<u8>)>;

    fn head(status: &str, content_length: usize) -> Vec<u8> {
        format!(
            "HTTP/1.1 {status}\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n"
        )
        .into_bytes()
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
    }

    /// 按顺序为每个连接返回一个响应，返回下载地址和已接受的连接数
    async fn serve(replies: Vec<Reply>) -> (String, Arc<AtomicU32>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicU32::new(0));
        let counter = accepted.clone();

        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;
                for (delay_ms, bytes) in reply {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    if socket.write_all(&bytes).await.is_err() {
                        break;
                    }
                }
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/jdk.tar.gz"), accepted)
    }

    fn fetcher(read_timeout_sec: u64) -> HttpFetcher {
        let config = DownloadConfig {
            read_timeout_sec,
            ..DownloadConfig::default()
        };
        HttpFetcher::new(&config).unwrap().with_progress(false)
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".downloading"))
            .collect()
    }

    #[tokio::test]
    async fn test_error_status_then_success_through_retry() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("jdk.tar.gz");
        let (url, accepted) = serve(vec![
            vec![(0, head("503 Service Unavailable", 0))],
            vec![(0, head("200 OK", 4)), (0, b"jdk!".to_vec())],
        ])
        .await;
        let fetcher = fetcher(5);

        let err = fetcher.fetch(&url, &dest).await.unwrap_err();
        assert!(matches!(err, AppError::Network { .. }));
        assert!(!dest.exists());
        assert!(leftovers(dir.path()).is_empty());

        retry(&policy(1), || fetcher.fetch(&url, &dest)).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"jdk!");
        assert!(leftovers(dir.path()).is_empty());
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_but_steady_body_is_not_timed_out() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("jdk.tar.gz");
        let mut reply = vec![(0, head("200 OK", 6))];
        for byte in b"abcdef" {
            reply.push((300, vec![*byte]));
        }
        let (url, _) = serve(vec![reply]).await;

        fetcher(1).fetch(&url, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"abcdef");
    }

    #[tokio::test]
    async fn test_stalled_body_times_out_and_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("jdk.tar.gz");
        let (url, _) = serve(vec![vec![
            (0, head("200 OK", 8)),
            (0, b"ab".to_vec()),
            (3000, b"cdefgh".to_vec()),
        ]])
        .await;

        let err = fetcher(1).fetch(&url, &dest).await.unwrap_err();
        assert!(matches!(err, AppError::Network { .. }));
        assert!(!dest.exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_truncated_body_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("jdk.tar.gz");
        let (url, _) = serve(vec![vec![(0, head("200 OK", 100)), (0, b"short".to_vec())]]).await;

        let err = fetcher(5).fetch(&url, &dest).await.unwrap_err();
        assert!(matches!(err, AppError::Network { .. }));
        assert!(!dest.exists());
        assert!(leftovers(dir.path()).is_empty());
    }
}
