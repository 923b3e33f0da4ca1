//! Piston 互換 API を使った ExecutionClient 実装
//!
//! ## 責務
//!
//! - 実行リクエストを Piston の `POST {base}/execute` 形式に変換して送信
//! - タイムアウト・到達不能をドメインの `ExecutionError` に正規化
//!
//! The room never waits on this client; the use case layer invokes it from
//! a spawned task and re-enters the room with the result.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ExecutionClient, ExecutionError, ExecutionRequest, RunOutput};

/// Public Piston instance; overridable for self-hosted deployments.
pub const DEFAULT_EXECUTION_URL: &str = "https://emkc.org/api/v2/piston";

/// Upper bound on one execution round trip.
pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct PistonRequest {
    language: String,
    version: String,
    files: Vec<PistonFile>,
    stdin: String,
}

#[derive(Debug, Serialize)]
struct PistonFile {
    content: String,
}

#[derive(Debug, Deserialize)]
struct PistonResponse {
    run: PistonRun,
}

#[derive(Debug, Deserialize)]
struct PistonRun {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    output: String,
}

pub struct PistonExecutionClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PistonExecutionClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

impl Default for PistonExecutionClient {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTION_URL.to_string(), DEFAULT_EXECUTION_TIMEOUT)
    }
}

#[async_trait]
impl ExecutionClient for PistonExecutionClient {
    async fn execute(&self, request: ExecutionRequest) -> Result<RunOutput, ExecutionError> {
        let body = PistonRequest {
            language: request.language.as_str().to_string(),
            version: request.version,
            files: vec![PistonFile {
                content: request.code,
            }],
            stdin: request.stdin,
        };

        let url = format!("{}/execute", self.base_url);
        tracing::debug!(
            "Forwarding {} execution to {}",
            request.language.as_str(),
            url
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecutionError::Timeout(self.timeout)
                } else {
                    ExecutionError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ExecutionError::Unavailable(format!(
                "execution service returned {}",
                response.status()
            )));
        }

        let parsed: PistonResponse = response
            .json()
            .await
            .map_err(|e| ExecutionError::Unavailable(e.to_string()))?;

        Ok(RunOutput {
            stdout: parsed.run.stdout,
            stderr: parsed.run.stderr,
            output: parsed.run.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;

    #[test]
    fn test_request_body_matches_piston_wire_format() {
        // テスト項目: リクエストボディが Piston の形式に合致する
        // given (前提条件):
        let body = PistonRequest {
            language: Language::Python.as_str().to_string(),
            version: "*".to_string(),
            files: vec![PistonFile {
                content: "print(1)".to_string(),
            }],
            stdin: "".to_string(),
        };

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&body).unwrap();

        // then (期待する結果):
        assert_eq!(json["language"], "python");
        assert_eq!(json["version"], "*");
        assert_eq!(json["files"][0]["content"], "print(1)");
        assert_eq!(json["stdin"], "");
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        // テスト項目: 欠けたフィールドがあってもレスポンスをパースできる
        // given (前提条件):
        let payload = r#"{"run":{"output":"1\n"}}"#;

        // when (操作):
        let parsed: PistonResponse = serde_json::from_str(payload).unwrap();

        // then (期待する結果):
        assert_eq!(parsed.run.output, "1\n");
        assert_eq!(parsed.run.stdout, "");
        assert_eq!(parsed.run.stderr, "");
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_normalized() {
        // テスト項目: base URL 末尾のスラッシュは除去される
        // given (前提条件):
        let client =
            PistonExecutionClient::new("http://localhost:2000/api/".to_string(), DEFAULT_EXECUTION_TIMEOUT);

        // when (操作) / then (期待する結果):
        assert_eq!(client.base_url, "http://localhost:2000/api");
    }
}
