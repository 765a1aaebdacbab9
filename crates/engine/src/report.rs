//! 리포트 집계 -- 워크플로우 결과를 요약/발견/권고로 가공
//!
//! 하나 이상의 [`WorkflowResult`]를 받아 실행 요약, 심각도 분류된
//! 발견 사항 목록, 권고 목록을 만듭니다. 파싱된 컬렉션은 스텝 등장
//! 순서를 그대로 따라 평탄화되며, 원본 결과도 리포트에 보존됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use redpost_core::types::Severity;

use crate::handler::{StepOutcome, ToolKind};
use crate::orchestrator::{StepResult, WorkflowResult};
use crate::parser::ParsedFinding;

/// 심각도별 발견 사항 개수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTally {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl RiskTally {
    fn bucket(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }

    /// 전체 발견 사항 수를 반환합니다.
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }

    /// 기록된 가장 높은 심각도를 반환합니다.
    pub fn highest(&self) -> Option<Severity> {
        if self.critical > 0 {
            Some(Severity::Critical)
        } else if self.high > 0 {
            Some(Severity::High)
        } else if self.medium > 0 {
            Some(Severity::Medium)
        } else if self.low > 0 {
            Some(Severity::Low)
        } else if self.info > 0 {
            Some(Severity::Info)
        } else {
            None
        }
    }
}

/// 실행 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// 전체 스텝 수 (`successful + failed`와 항상 일치)
    pub total_steps: usize,
    pub successful_steps: usize,
    pub failed_steps: usize,
    pub risk_tally: RiskTally,
}

/// 심각도가 부여된 개별 발견 사항
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFinding {
    /// 발견된 스텝 이름
    pub step: String,
    /// 발견한 도구
    pub tool: ToolKind,
    pub severity: Severity,
    /// 한 줄 제목
    pub title: String,
    /// 상세 내용
    pub detail: String,
}

/// 리포트에 보존되는 원본 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSource {
    /// 단일 워크플로우 결과
    Single(WorkflowResult),
    /// 여러 워크플로우 결과를 묶은 합성 컨테이너
    Combined {
        timestamp: DateTime<Utc>,
        workflows: Vec<WorkflowResult>,
    },
}

impl ReportSource {
    fn results(&self) -> &[WorkflowResult] {
        match self {
            Self::Single(result) => std::slice::from_ref(result),
            Self::Combined { workflows, .. } => workflows,
        }
    }
}

/// 종합 보안 리포트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub findings: Vec<ReportFinding>,
    pub recommendations: Vec<String>,
    /// 집계 전 원본 결과
    pub raw: ReportSource,
}

impl Report {
    /// 단일 워크플로우 결과로 리포트를 생성합니다.
    pub fn from_result(result: WorkflowResult) -> Self {
        Self::build(ReportSource::Single(result))
    }

    /// 여러 워크플로우 결과를 묶어 리포트를 생성합니다.
    pub fn from_results(results: Vec<WorkflowResult>) -> Self {
        Self::build(ReportSource::Combined {
            timestamp: Utc::now(),
            workflows: results,
        })
    }

    fn build(raw: ReportSource) -> Self {
        let findings = extract_findings(raw.results());
        let mut summary = ReportSummary::default();
        for result in raw.results() {
            summary.total_steps += result.steps.len();
            summary.successful_steps += result.succeeded_steps();
            summary.failed_steps += result.failed_steps();
        }
        for finding in &findings {
            summary.risk_tally.bucket(finding.severity);
            metrics::counter!(
                redpost_core::metrics::ENGINE_FINDINGS_TOTAL,
                redpost_core::metrics::LABEL_SEVERITY => finding.severity.to_string()
            )
            .increment(1);
        }

        let recommendations = derive_recommendations(&findings);

        Self {
            summary,
            findings,
            recommendations,
            raw,
        }
    }
}

/// 스텝 순서를 보존하며 파싱 결과를 발견 사항으로 평탄화합니다.
fn extract_findings(results: &[WorkflowResult]) -> Vec<ReportFinding> {
    let mut findings = Vec::new();
    for result in results {
        for step in &result.steps {
            let StepOutcome::Completed { parsed, .. } = &step.outcome else {
                continue;
            };
            collect_step_findings(step, parsed, &mut findings);
        }
    }
    findings
}

fn collect_step_findings(step: &StepResult, parsed: &ParsedFinding, out: &mut Vec<ReportFinding>) {
    let make = |severity, title: String, detail: String| ReportFinding {
        step: step.name.clone(),
        tool: step.tool,
        severity,
        title,
        detail,
    };

    match parsed {
        ParsedFinding::Recon { hosts, ports, .. } => {
            for host in hosts {
                out.push(make(
                    Severity::Info,
                    "Host discovered".to_owned(),
                    host.to_string(),
                ));
            }
            // 열린 포트만 위험 목록에 오름
            for port in ports.iter().filter(|p| p.is_open()) {
                out.push(make(
                    Severity::Info,
                    format!("Open port {}/{}", port.port, port.protocol),
                    port.to_string(),
                ));
            }
        }
        ParsedFinding::Web {
            technologies,
            vulnerabilities,
            ..
        } => {
            for tech in technologies {
                out.push(make(
                    Severity::Info,
                    "Technology identified".to_owned(),
                    tech.clone(),
                ));
            }
            for vuln in vulnerabilities {
                out.push(make(
                    web_severity(&vuln.id, &vuln.description),
                    vuln.id.clone(),
                    vuln.description.clone(),
                ));
            }
        }
        ParsedFinding::Credential { credentials, .. } => {
            for credential in credentials {
                out.push(make(
                    Severity::High,
                    "Credentials compromised".to_owned(),
                    credential.to_string(),
                ));
            }
        }
        ParsedFinding::Exploit { sessions, .. } => {
            for session in sessions {
                out.push(make(
                    Severity::Critical,
                    "Remote session established".to_owned(),
                    session.to_string(),
                ));
            }
        }
        ParsedFinding::Wireless { keys, .. } => {
            for _key in keys {
                // 키 값 자체는 리포트에 싣지 않음
                out.push(make(
                    Severity::High,
                    "Wireless key recovered".to_owned(),
                    "network key cracked from capture".to_owned(),
                ));
            }
        }
    }
}

/// 웹 발견 사항의 심각도를 키워드로 추정합니다.
fn web_severity(id: &str, description: &str) -> Severity {
    let text = format!("{id} {description}").to_ascii_lowercase();
    const ESCALATE: [&str; 4] = [
        "sql injection",
        "remote code",
        "traversal",
        "command injection",
    ];
    if ESCALATE.iter().any(|kw| text.contains(kw)) {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// 발견 사항 집합에서 중복 없는 권고 목록을 만듭니다.
fn derive_recommendations(findings: &[ReportFinding]) -> Vec<String> {
    let mut recommendations = Vec::new();
    let mut push = |text: &str| {
        if !recommendations.iter().any(|r| r == text) {
            recommendations.push(text.to_owned());
        }
    };

    for finding in findings {
        match (finding.severity, finding.title.as_str()) {
            (Severity::Critical, "Remote session established") => {
                push("Isolate affected hosts and rebuild compromised systems.");
            }
            (Severity::High, "Credentials compromised") => {
                push("Rotate the compromised credentials and enforce a strong password policy.");
            }
            (Severity::High, "Wireless key recovered") => {
                push("Migrate wireless networks to WPA3 with strong passphrases.");
            }
            (Severity::High, _) => {
                push("Sanitize and parameterize all database queries; patch web-facing services.");
            }
            (Severity::Medium, _) => {
                push("Patch the web server and review exposed administrative paths.");
            }
            (Severity::Info, title) if title.starts_with("Open port") => {
                push("Close unnecessary ports and restrict exposed services with a firewall.");
            }
            _ => {}
        }
    }

    recommendations
}
