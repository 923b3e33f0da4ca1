//! ExecutionClient trait 定義
//!
//! リモートのコード実行サービスへのインターフェース。
//! 具体的な実装（Piston API など）は Infrastructure 層が提供します。
//!
//! The room never waits on this synchronously: a run is forwarded from a
//! spawned task and its result re-enters the room as an ordinary broadcast.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::language::Language;

/// One execution request, exactly as submitted by a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub code: String,
    pub language: Language,
    /// Runtime version selector; `"*"` means "latest available".
    pub version: String,
    pub stdin: String,
}

/// Captured output of a completed execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    /// Interleaved stdout + stderr, as shown in the shared output panel.
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("code execution timed out after {0:?}")]
    Timeout(Duration),
    #[error("execution service unavailable: {0}")]
    Unavailable(String),
}

/// Opaque async adapter to the remote execution service.
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Run the submitted code with a bounded timeout.
    async fn execute(&self, request: ExecutionRequest) -> Result<RunOutput, ExecutionError>;
}
