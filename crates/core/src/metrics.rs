//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `redpost_`
//! - 모듈명: `engine_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(redpost_core::metrics::ENGINE_STEPS_EXECUTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 도구 이름 레이블 키
pub const LABEL_TOOL: &str = "tool";

/// 워크플로우 이름 레이블 키
pub const LABEL_WORKFLOW: &str = "workflow";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

/// 심각도 레이블 키 (info, low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

// ─── 엔진 메트릭 ──────────────────────────────────────────────────

/// 실행된 워크플로우 수 (counter)
pub const ENGINE_WORKFLOWS_EXECUTED_TOTAL: &str = "redpost_engine_workflows_executed_total";

/// 실행된 스텝 수 (counter, 레이블: tool, result)
pub const ENGINE_STEPS_EXECUTED_TOTAL: &str = "redpost_engine_steps_executed_total";

/// 외부 도구 호출 수 (counter, 레이블: tool)
pub const ENGINE_TOOL_INVOCATIONS_TOTAL: &str = "redpost_engine_tool_invocations_total";

/// 정책에 의해 거부된 명령 수 (counter)
pub const ENGINE_POLICY_DENIED_TOTAL: &str = "redpost_engine_policy_denied_total";

/// 추출된 발견 사항 수 (counter, 레이블: severity)
pub const ENGINE_FINDINGS_TOTAL: &str = "redpost_engine_findings_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 익스포터 초기화 직후 한 번 호출합니다.
pub fn describe_metrics() {
    use metrics::describe_counter;

    describe_counter!(
        ENGINE_WORKFLOWS_EXECUTED_TOTAL,
        "Total number of workflow executions"
    );
    describe_counter!(
        ENGINE_STEPS_EXECUTED_TOTAL,
        "Total number of workflow steps executed"
    );
    describe_counter!(
        ENGINE_TOOL_INVOCATIONS_TOTAL,
        "Total number of external tool invocations"
    );
    describe_counter!(
        ENGINE_POLICY_DENIED_TOTAL,
        "Total number of commands denied by the security policy"
    );
    describe_counter!(
        ENGINE_FINDINGS_TOTAL,
        "Total number of findings extracted from tool output"
    );
}
