//! 엔진 에러 타입
//!
//! [`EngineError`]는 오케스트레이션 경계의 에러만 표현합니다.
//! 개별 스텝의 도구 실행 실패는 에러가 아니라
//! [`StepOutcome::Failed`](crate::handler::StepOutcome)로 표현되어
//! 워크플로우 결과 데이터에 남습니다.
//! `From<EngineError> for RedpostError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use redpost_core::error::{RedpostError, WorkflowError};

/// 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 워크플로우 정의 파일 로딩 실패
    #[error("workflow load error: {path}: {reason}")]
    WorkflowLoad {
        /// 정의 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 워크플로우 정의 유효성 검증 실패
    #[error("workflow validation error: workflow '{workflow}': {reason}")]
    WorkflowValidation {
        /// 문제가 된 워크플로우 이름
        workflow: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 잘못된 스텝 명세
    ///
    /// 워크플로우 실행 중 발생하면 예상치 못한 결함으로 취급되어
    /// 남은 스텝 실행을 중단시킵니다 (부분 실패 결과 반환).
    #[error("invalid step spec: step '{step}': {reason}")]
    StepSpec {
        /// 스텝 이름
        step: String,
        /// 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EngineError> for RedpostError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::WorkflowLoad { path, reason } => {
                RedpostError::Workflow(WorkflowError::Load { path, reason })
            }
            EngineError::WorkflowValidation { workflow, reason } => {
                RedpostError::Workflow(WorkflowError::Validation { workflow, reason })
            }
            EngineError::StepSpec { step, reason } => {
                RedpostError::Workflow(WorkflowError::StepSpec { step, reason })
            }
            EngineError::Io(e) => RedpostError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_load_error_display() {
        let err = EngineError::WorkflowLoad {
            path: "/etc/redpost/workflows.yaml".to_owned(),
            reason: "invalid YAML".to_owned(),
        };
        assert!(err.to_string().contains("workflows.yaml"));
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn step_spec_error_display() {
        let err = EngineError::StepSpec {
            step: "exploit".to_owned(),
            reason: "metasploit step requires a module".to_owned(),
        };
        assert!(err.to_string().contains("exploit"));
    }

    #[test]
    fn converts_to_redpost_error() {
        let err = EngineError::WorkflowValidation {
            workflow: "web_audit".to_owned(),
            reason: "no steps".to_owned(),
        };
        let top: RedpostError = err.into();
        assert!(matches!(
            top,
            RedpostError::Workflow(WorkflowError::Validation { .. })
        ));
    }

    #[test]
    fn io_error_converts_to_top_level_io() {
        let err = EngineError::Io(std::io::Error::other("boom"));
        let top: RedpostError = err.into();
        assert!(matches!(top, RedpostError::Io(_)));
    }
}
