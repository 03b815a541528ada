/// 钓鱼邮件分析服务客户端
///
/// 封装与远程分析接口的单次请求/响应交互
use crate::config::Config;
use crate::error::ApiError;
use crate::models::item::EmailItem;
use crate::models::verdict::{AnalysisResponse, Verdict};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 服务端未给出原因时使用的失败信息
pub const GENERIC_FAILURE_MESSAGE: &str = "分析失败";

/// 分析能力
///
/// 每次调用只处理一封邮件，不修改邮件列表。
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, item: &EmailItem) -> Result<Verdict, ApiError>;
}

/// 基于 HTTP multipart 上传的分析客户端
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    endpoint: String,
    upload_field: String,
}

impl HttpAnalysisClient {
    /// 创建新的分析客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let endpoint = config.analyze_url();
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.request_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::request_failed(&endpoint, e))?;

        Ok(Self {
            http,
            endpoint,
            upload_field: config.upload_field.clone(),
        })
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, item: &EmailItem) -> Result<Verdict, ApiError> {
        let content = tokio::fs::read(&item.path)
            .await
            .map_err(|e| ApiError::file_read_failed(item.path.display().to_string(), e))?;

        debug!(
            "上传邮件 {} ({} 字节) 到 {}",
            item.name,
            content.len(),
            self.endpoint
        );

        let part = Part::bytes(content)
            .file_name(item.name.clone())
            .mime_str("message/rfc822")
            .map_err(|e| ApiError::request_failed(&self.endpoint, e))?;
        let form = Form::new().part(self.upload_field.clone(), part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(&self.endpoint, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::request_failed(&self.endpoint, e))?;

        debug!("分析接口返回 status={} ({} 字节)", status, body.len());

        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        parse_verdict(&self.endpoint, &body)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// 从失败响应体中提取 `error` 字段，取不到时返回通用信息
pub fn extract_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

/// 解析成功响应体
pub fn parse_verdict(endpoint: &str, body: &[u8]) -> Result<Verdict, ApiError> {
    let response: AnalysisResponse =
        serde_json::from_slice(body).map_err(|source| ApiError::JsonParseFailed {
            endpoint: endpoint.to_string(),
            source,
        })?;
    Ok(response.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_from_body() {
        let body = br#"{"error": "No email file provided"}"#;
        assert_eq!(extract_error_message(body), "No email file provided");
    }

    #[test]
    fn test_extract_error_message_falls_back() {
        assert_eq!(extract_error_message(b""), GENERIC_FAILURE_MESSAGE);
        assert_eq!(extract_error_message(b"<html>502</html>"), GENERIC_FAILURE_MESSAGE);
        assert_eq!(extract_error_message(br#"{"detail": "x"}"#), GENERIC_FAILURE_MESSAGE);
        assert_eq!(extract_error_message(br#"{"error": {"code": 1}}"#), GENERIC_FAILURE_MESSAGE);
        assert_eq!(extract_error_message(br#"{"error": ""}"#), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_parse_verdict_malformed_body() {
        let err = parse_verdict("http://svc/analyze", b"not json").unwrap_err();
        assert!(matches!(err, ApiError::JsonParseFailed { .. }));
    }

    #[test]
    fn test_parse_verdict_ok() {
        let verdict = parse_verdict(
            "http://svc/analyze",
            br#"{"is_suspicious": true, "sender": "x", "subject": "y", "recipient": "z",
                "date": "d", "analysis": ["a", "b"]}"#,
        )
        .unwrap();
        assert!(verdict.is_suspicious);
        assert_eq!(verdict.findings.len(), 2);
    }
}
