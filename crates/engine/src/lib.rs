#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`registry`]: 설정 기반 도구 탐색 및 불변 레지스트리
//! - [`runner`]: 외부 프로세스 실행과 성공/실패 봉투
//! - [`parser`]: 도구 계열별 출력 파서 (정찰, 웹, 자격증명, 익스플로잇, 무선)
//! - [`handler`]: 도구별 인자 규약과 실행/파싱 결합
//! - [`workflow`]: YAML 워크플로우 정의 로드와 내장 기본 워크플로우
//! - [`orchestrator`]: 스텝 순차 실행, 옵션 병합, 부분 실패 처리
//! - [`report`]: 결과 요약, 심각도 분류, 권고 생성
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! WorkflowSet -> Orchestrator -> ToolHandler -> ToolRunner -> 외부 도구
//!                    |               |              |
//!                옵션 병합        인자 규약    레지스트리 + 정책
//!                    v
//!               WorkflowResult -> Report
//! ```

pub mod error;
pub mod handler;
pub mod orchestrator;
pub mod parser;
pub mod registry;
pub mod report;
pub mod runner;
pub mod workflow;

// --- 주요 타입 re-export ---

// 오케스트레이터
pub use orchestrator::{Orchestrator, StepOverrides, StepResult, WorkflowResult};

// 워크플로우 정의
pub use workflow::{StepSpec, WorkflowDefinition, WorkflowSet};

// 레지스트리와 러너
pub use registry::{ProbeFs, SystemFs, ToolDescriptor, ToolRegistry};
pub use runner::{ExecutionResult, ProcessLauncher, TokioLauncher, ToolRunner};

// 핸들러
pub use handler::{StepOutcome, ToolHandler, ToolKind};

// 파서
pub use parser::ParsedFinding;

// 리포트
pub use report::{Report, ReportFinding, ReportSummary};

// 에러
pub use error::EngineError;
