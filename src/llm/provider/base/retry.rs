//! HTTP 请求发送与重试逻辑
//!
//! 提供通用的 LLM API 请求发送函数，包含重试、429 限流处理和指数退避

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};

use crate::error::{Result, TestgenError};
use crate::llm::ProgressReporter;

/// 判断错误是否应该重试（当前仅对连接失败重试）
fn is_retryable_error(error: &TestgenError) -> bool {
    match error {
        // 连接失败 -> 重试（大小写不敏感）
        TestgenError::Llm(msg) => msg.to_lowercase().contains("connection failed"),

        // 其他错误 -> 不重试
        _ => false,
    }
}

/// 解析 Retry-After header 值
///
/// 支持两种格式：
/// - 秒数：`120`
/// - HTTP 日期：`Wed, 21 Oct 2015 07:28:00 GMT`
///
/// 日期早于当前时间时返回 `Some(0)`，格式无效时返回 `None`。
fn parse_retry_after(value: &str) -> Option<u64> {
    if let Ok(secs) = value.parse::<u64>() {
        return Some(secs);
    }

    if let Ok(date) = httpdate::parse_http_date(value) {
        let now = SystemTime::now();
        return Some(date.duration_since(now).map(|d| d.as_secs()).unwrap_or(0));
    }

    None
}

/// 尝试发送一次 HTTP 请求（只处理网络层错误）
async fn try_send_request<Req: Serialize>(
    client: &Client,
    endpoint: &str,
    request_body: &Req,
    provider_name: &str,
) -> Result<reqwest::Response> {
    tracing::debug!("Sending request to: {}", endpoint);

    client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .json(request_body)
        .send()
        .await
        .map_err(|e| {
            let error_details = e.to_string();
            tracing::debug!("{} API request failed: {}", provider_name, error_details);

            if e.is_timeout() {
                TestgenError::Llm(format!(
                    "{} API request timeout: {}",
                    provider_name, error_details
                ))
            } else if e.is_connect() {
                TestgenError::Llm(format!(
                    "{} API connection failed: {}",
                    provider_name, error_details
                ))
            } else {
                TestgenError::Network(e)
            }
        })
}

/// 重试参数
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 最大重试次数
    pub max_retries: usize,
    /// 初始重试延迟（毫秒）
    pub retry_delay_ms: u64,
    /// 最大重试延迟（毫秒）
    pub max_retry_delay_ms: u64,
}

impl From<&crate::config::NetworkConfig> for RetryPolicy {
    fn from(config: &crate::config::NetworkConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            max_retry_delay_ms: config.max_retry_delay_ms,
        }
    }
}

fn report_retry(progress: Option<&dyn ProgressReporter>, attempt: usize, max_retries: usize) {
    if let Some(p) = progress {
        p.append_suffix(&format!("(retrying {}/{})", attempt, max_retries));
    }
}

/// 发送 LLM API 请求的通用函数（带重试机制）
///
/// # Arguments
/// * `client` - HTTP 客户端
/// * `endpoint` - API 端点
/// * `request_body` - 请求体
/// * `provider_name` - Provider 名称（用于日志和错误信息）
/// * `progress` - 可选的进度报告（用于显示重试进度）
/// * `policy` - 重试参数
pub async fn send_llm_request<Req, Resp>(
    client: &Client,
    endpoint: &str,
    request_body: &Req,
    provider_name: &str,
    progress: Option<&dyn ProgressReporter>,
    policy: RetryPolicy,
) -> Result<Resp>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let RetryPolicy {
        max_retries,
        retry_delay_ms,
        max_retry_delay_ms,
    } = policy;
    let mut attempt = 0;

    loop {
        attempt += 1;

        let response = match try_send_request(client, endpoint, request_body, provider_name).await
        {
            Ok(resp) => resp,
            Err(e) => {
                if !is_retryable_error(&e) || attempt > max_retries {
                    return Err(e);
                }

                report_retry(progress, attempt, max_retries);

                let delay =
                    calculate_exponential_backoff(attempt, retry_delay_ms, max_retry_delay_ms);
                tracing::debug!(
                    "{} API network error (attempt {}/{}): {}. Retrying in {:.1}s...",
                    provider_name,
                    attempt,
                    max_retries + 1,
                    e,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        let status = response.status();

        // 429 限流：解析 Retry-After 并重试
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| {
                    let result = parse_retry_after(v);
                    if result.is_none() {
                        tracing::warn!("Ignoring invalid Retry-After header: {}", v);
                    }
                    result
                });

            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!("Failed to read 429 response body: {}", e);
                format!("<body read error: {}>", e)
            });

            tracing::debug!(
                "{} API rate limited (429), Retry-After: {:?}",
                provider_name,
                retry_after
            );

            if attempt > max_retries {
                return Err(TestgenError::LlmApi {
                    status: 429,
                    message: format!("{}: {}", provider_name, body),
                });
            }

            report_retry(progress, attempt, max_retries);

            // 优先使用 Retry-After，否则使用指数退避
            let delay = if let Some(secs) = retry_after {
                let retry_after_ms = secs.saturating_mul(1000);
                if retry_after_ms > max_retry_delay_ms {
                    return Err(TestgenError::Llm(format!(
                        "{} rate limited: Retry-After {}s exceeds network.max_retry_delay_ms ({}ms)",
                        provider_name, secs, max_retry_delay_ms
                    )));
                }
                tracing::debug!("Using Retry-After header: {} seconds", secs);
                Duration::from_secs(secs)
            } else {
                calculate_exponential_backoff(attempt, retry_delay_ms, max_retry_delay_ms)
            };

            tracing::debug!(
                "{} API rate limited (attempt {}/{}). Retrying in {:.1}s...",
                provider_name,
                attempt,
                max_retries + 1,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        let response_text = response.text().await?;

        tracing::debug!("{} API response status: {}", provider_name, status);
        tracing::debug!("{} API response body: {}", provider_name, response_text);

        if !status.is_success() {
            return Err(TestgenError::LlmApi {
                status: status.as_u16(),
                message: format!("{}: {}", provider_name, response_text),
            });
        }

        if attempt > 1 {
            tracing::debug!(
                "{} API request succeeded after {} attempts",
                provider_name,
                attempt
            );
        }

        return serde_json::from_str(&response_text).map_err(|e| {
            TestgenError::Llm(format!(
                "Failed to parse {} response: {}. Body: {}",
                provider_name,
                e,
                super::truncate_for_preview(&response_text)
            ))
        });
    }
}

/// 计算指数退避延迟
fn calculate_exponential_backoff(
    attempt: usize,
    retry_delay_ms: u64,
    max_retry_delay_ms: u64,
) -> Duration {
    const MIN_RETRY_DELAY_MS: u64 = 100;
    let multiplier = 1u64.checked_shl((attempt - 1) as u32).unwrap_or(u64::MAX);
    let delay_ms = retry_delay_ms
        .saturating_mul(multiplier)
        .min(max_retry_delay_ms)
        .max(MIN_RETRY_DELAY_MS);
    Duration::from_millis(delay_ms)
}
