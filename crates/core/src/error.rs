//! 에러 타입 — 도메인별 에러 정의

/// Redpost 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum RedpostError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 워크플로우 정의/실행 에러
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 워크플로우 정의/실행 에러
///
/// 스텝 수준의 도구 실행 실패는 에러가 아니라 결과 데이터로 표현되므로
/// 여기에 포함되지 않습니다. 이 에러는 정의 로딩, 유효성 검증,
/// 잘못된 스텝 명세 같은 오케스트레이션 경계의 문제만 다룹니다.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// 워크플로우 정의 파일 로딩 실패
    #[error("workflow load error: {path}: {reason}")]
    Load { path: String, reason: String },

    /// 워크플로우 정의 유효성 검증 실패
    #[error("workflow validation error: workflow '{workflow}': {reason}")]
    Validation { workflow: String, reason: String },

    /// 잘못된 스텝 명세 (필수 필드 누락 등)
    #[error("invalid step spec: step '{step}': {reason}")]
    StepSpec { step: String, reason: String },
}
