//! 도구 러너 — 외부 프로세스 실행과 성공/실패 봉투
//!
//! [`ToolRunner`]는 레지스트리에서 해석한 실행 파일을 주어진 인자로
//! 스폰하고, 종료까지 기다린 뒤 결과를 [`ExecutionResult`]로 래핑합니다.
//! 호출당 정확히 한 번만 시도하며, 재시도와 타임아웃은 이 계층의
//! 관심사가 아닙니다 (타임아웃은 호스트 환경의 프로세스 관리 책임).
//!
//! 스폰은 [`ProcessLauncher`] trait 뒤에 있어 테스트에서 가짜 런처를
//! 주입할 수 있습니다. 프로덕션 구현은 [`TokioLauncher`]입니다.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use redpost_core::metrics as m;
use redpost_core::pipeline::{CommandFormatter, CommandLine, CommandPolicy};

use crate::registry::ToolRegistry;

/// 한 번의 도구 실행 결과
///
/// 성공/실패 어느 쪽이든 실제 시도한 명령줄을 항상 기록합니다 (감사 추적).
/// 실패 시에도 캡처된 부분 출력은 버리지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// 성공 여부
    pub success: bool,
    /// 캡처된 표준 출력 (실패 시에도 부분 출력 보존)
    pub output: String,
    /// 실제 실행(시도)한 명령줄
    pub command: String,
    /// 실패 사유 (성공 시 None)
    pub error: Option<String>,
}

impl ExecutionResult {
    /// 성공 결과를 생성합니다.
    pub fn success(output: String, command: String) -> Self {
        Self {
            success: true,
            output,
            command,
            error: None,
        }
    }

    /// 출력 없는 실패 결과를 생성합니다.
    pub fn failure(error: String, command: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            command,
            error: Some(error),
        }
    }

    /// 부분 출력을 보존하는 실패 결과를 생성합니다.
    pub fn failure_with_output(error: String, output: String, command: String) -> Self {
        Self {
            success: false,
            output,
            command,
            error: Some(error),
        }
    }
}

/// 종료된 프로세스의 캡처 결과
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// 정상 종료(exit 0) 여부
    pub success: bool,
    /// 종료 코드 (시그널 종료 시 None)
    pub code: Option<i32>,
    /// 표준 출력
    pub stdout: String,
    /// 표준 에러
    pub stderr: String,
}

/// Process spawn seam.
///
/// Production code uses [`TokioLauncher`]; tests inject a fake launcher
/// with canned outputs so the runner and everything above it can be
/// exercised without spawning real security tools.
pub trait ProcessLauncher: Send + Sync {
    /// Spawns the command, waits for completion, and captures its output.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the process cannot be
    /// spawned at all (missing executable, permission denied).
    fn launch(
        &self,
        command: &CommandLine,
    ) -> impl Future<Output = Result<ProcessOutput, std::io::Error>> + Send;
}

/// `tokio::process` 기반 프로덕션 런처
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioLauncher;

impl ProcessLauncher for TokioLauncher {
    async fn launch(&self, command: &CommandLine) -> Result<ProcessOutput, std::io::Error> {
        let output = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// 도구 러너
///
/// 불변 레지스트리, 명령 정책, 플랫폼 포매터를 소유하고
/// 도구 이름 + 인자를 [`ExecutionResult`]로 변환합니다.
pub struct ToolRunner<L = TokioLauncher> {
    registry: Arc<ToolRegistry>,
    policy: Arc<dyn CommandPolicy>,
    formatter: Arc<dyn CommandFormatter>,
    launcher: L,
}

impl<L: ProcessLauncher> ToolRunner<L> {
    /// 러너를 생성합니다.
    pub fn new(
        registry: Arc<ToolRegistry>,
        policy: Arc<dyn CommandPolicy>,
        formatter: Arc<dyn CommandFormatter>,
        launcher: L,
    ) -> Self {
        Self {
            registry,
            policy,
            formatter,
            launcher,
        }
    }

    /// 레지스트리에 대한 참조를 반환합니다.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// 도구를 실행하고 결과를 봉투로 반환합니다.
    ///
    /// 실행 경로:
    /// 1. 레지스트리 해석 — 실패 시 프로세스를 스폰하지 않고 즉시 실패
    /// 2. 포매터로 명령줄 완성
    /// 3. 정책 게이트 판정 — 거부는 실패 데이터, 예외 아님
    /// 4. 스폰 후 종료 대기, 비정상 종료는 부분 출력을 보존한 실패
    pub async fn execute(&self, tool: &str, args: &[String]) -> ExecutionResult {
        metrics::counter!(m::ENGINE_TOOL_INVOCATIONS_TOTAL, m::LABEL_TOOL => tool.to_owned())
            .increment(1);

        let Some(path) = self
            .registry
            .resolve(tool)
            .and_then(|d| d.path.as_deref())
        else {
            debug!(tool, "tool unavailable, failing fast");
            return ExecutionResult::failure(
                format!("Tool {tool} not found"),
                tool.to_owned(),
            );
        };

        let command = self.formatter.format(path, args);
        let command_str = command.to_string();

        if !self.policy.allow(&command_str) {
            warn!(tool, policy = self.policy.name(), command = %command_str,
                "command denied by security policy");
            metrics::counter!(m::ENGINE_POLICY_DENIED_TOTAL).increment(1);
            return ExecutionResult::failure(
                "Command not allowed by security policy".to_owned(),
                command_str,
            );
        }

        debug!(tool, command = %command_str, "spawning tool");

        match self.launcher.launch(&command).await {
            Ok(process) if process.success => {
                ExecutionResult::success(process.stdout, command_str)
            }
            Ok(process) => {
                let code = process
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_owned());
                let mut error = format!("{tool} exited with status {code}");
                if !process.stderr.trim().is_empty() {
                    error.push_str(": ");
                    error.push_str(process.stderr.trim());
                }
                ExecutionResult::failure_with_output(error, process.stdout, command_str)
            }
            Err(e) => ExecutionResult::failure(
                format!("failed to launch {tool}: {e}"),
                command_str,
            ),
        }
    }
}
