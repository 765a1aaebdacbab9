//! 워크플로우 정의 -- YAML 정의 파일 로드와 내장 기본 워크플로우
//!
//! 정의 파일은 워크플로우 이름을 키로, 스텝 목록을 값으로 갖는 단일
//! YAML 매핑입니다. 개별 정의 파싱/검증 실패는 경고 로그를 남기고
//! 건너뜁니다. 파일이 없으면 빈 집합을 반환합니다 (에러 아님).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;
use crate::handler::ToolKind;

/// 정의 파일 크기 상한
const MAX_WORKFLOW_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// 워크플로우의 한 스텝 명세
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    /// 스텝 이름 (비어 있으면 실행 시 `unnamed_step`으로 대체)
    #[serde(default)]
    pub name: String,
    /// 실행할 도구
    #[serde(deserialize_with = "deserialize_tool")]
    pub tool: ToolKind,
    /// 도구에 전달할 추가 옵션
    #[serde(default)]
    pub options: Vec<String>,
    /// hydra 전용: 공격 대상 서비스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// metasploit 전용: 모듈 경로
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl StepSpec {
    /// 이름 있는 스텝을 생성합니다.
    pub fn new(name: impl Into<String>, tool: ToolKind, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            tool,
            options,
            service: None,
            module: None,
        }
    }
}

/// 도구 이름을 별칭까지 허용해 [`ToolKind`]로 변환합니다.
fn deserialize_tool<'de, D>(deserializer: D) -> Result<ToolKind, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    ToolKind::from_name(&name)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown tool: {name}")))
}

/// 이름 붙은 워크플로우 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// 워크플로우 이름
    pub name: String,
    /// 순서대로 실행될 스텝 목록
    pub steps: Vec<StepSpec>,
}

impl WorkflowDefinition {
    /// 정의 유효성을 검증합니다.
    ///
    /// # Errors
    /// - 이름이 비어 있는 경우
    /// - 스텝이 하나도 없는 경우
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::WorkflowValidation {
                workflow: self.name.clone(),
                reason: "workflow name must not be empty".to_owned(),
            });
        }
        if self.steps.is_empty() {
            return Err(EngineError::WorkflowValidation {
                workflow: self.name.clone(),
                reason: "workflow must contain at least one step".to_owned(),
            });
        }
        Ok(())
    }
}

/// YAML 정의 본문 (이름은 매핑 키에서 옴)
#[derive(Debug, Deserialize)]
struct DefinitionBody {
    #[serde(default)]
    steps: Vec<StepSpec>,
}

/// 로드된 워크플로우 정의 집합
#[derive(Debug, Clone, Default)]
pub struct WorkflowSet {
    workflows: BTreeMap<String, WorkflowDefinition>,
}

impl WorkflowSet {
    /// 정의 파일에서 워크플로우 집합을 로드합니다.
    ///
    /// 파일이 없으면 경고 로그를 남기고 빈 집합을 반환합니다.
    /// 개별 정의 파싱/검증 실패는 건너뛰고 나머지를 로드합니다.
    ///
    /// # Errors
    /// - 파일 크기가 상한을 초과하는 경우
    /// - 파일을 읽을 수 없는 경우 (없는 경우 제외)
    /// - 최상위 YAML 매핑 파싱에 실패한 경우
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "workflow file not found, using empty set");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(EngineError::WorkflowLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file metadata: {e}"),
                });
            }
        };

        if metadata.len() > MAX_WORKFLOW_FILE_SIZE {
            return Err(EngineError::WorkflowLoad {
                path: path.display().to_string(),
                reason: format!(
                    "file too large: {} bytes (max: {MAX_WORKFLOW_FILE_SIZE})",
                    metadata.len()
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| EngineError::WorkflowLoad {
                    path: path.display().to_string(),
                    reason: format!("failed to read file: {e}"),
                })?;

        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// YAML 문자열을 파싱해 워크플로우 집합을 생성합니다.
    ///
    /// # Errors
    /// 최상위가 매핑이 아니거나 YAML 문법이 깨진 경우.
    pub fn parse_yaml(yaml_str: &str, source: &str) -> Result<Self, EngineError> {
        if yaml_str.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: BTreeMap<String, serde_yaml::Value> =
            serde_yaml::from_str(yaml_str).map_err(|e| EngineError::WorkflowLoad {
                path: source.to_owned(),
                reason: format!("YAML parse error: {e}"),
            })?;

        let mut workflows = BTreeMap::new();
        for (name, value) in raw {
            let body: DefinitionBody = match serde_yaml::from_value(value) {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(workflow = %name, error = %e,
                        "failed to parse workflow definition, skipping");
                    continue;
                }
            };
            let definition = WorkflowDefinition {
                name: name.clone(),
                steps: body.steps,
            };
            if let Err(e) = definition.validate() {
                tracing::warn!(workflow = %name, error = %e,
                    "invalid workflow definition, skipping");
                continue;
            }
            workflows.insert(name, definition);
        }

        tracing::info!(source, count = workflows.len(), "loaded workflow definitions");
        Ok(Self { workflows })
    }

    /// 내장 기본 워크플로우 집합을 반환합니다.
    pub fn builtin() -> Self {
        let definitions = [
            WorkflowDefinition {
                name: "full_recon".to_owned(),
                steps: vec![
                    StepSpec::new(
                        "port_scan",
                        ToolKind::Nmap,
                        vec!["-sV".to_owned(), "-sC".to_owned()],
                    ),
                    StepSpec::new("web_fingerprint", ToolKind::Whatweb, vec![]),
                ],
            },
            WorkflowDefinition {
                name: "web_audit".to_owned(),
                steps: vec![
                    StepSpec::new("web_fingerprint", ToolKind::Whatweb, vec![]),
                    StepSpec::new("web_scan", ToolKind::Nikto, vec![]),
                    StepSpec::new("sql_injection", ToolKind::Sqlmap, vec!["--batch".to_owned()]),
                ],
            },
            WorkflowDefinition {
                name: "network_audit".to_owned(),
                steps: vec![
                    StepSpec::new("port_scan", ToolKind::Nmap, vec!["-sV".to_owned()]),
                    StepSpec::new("web_scan", ToolKind::Nikto, vec![]),
                ],
            },
            WorkflowDefinition {
                name: "wireless_audit".to_owned(),
                steps: vec![StepSpec::new("key_crack", ToolKind::Aircrack, vec![])],
            },
            WorkflowDefinition {
                name: "vulnerability_scan".to_owned(),
                steps: vec![
                    StepSpec::new(
                        "vuln_scan",
                        ToolKind::Nmap,
                        vec!["-sV".to_owned(), "--script".to_owned(), "vuln".to_owned()],
                    ),
                    StepSpec::new("web_scan", ToolKind::Nikto, vec![]),
                ],
            },
        ];

        Self {
            workflows: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    /// 이름으로 워크플로우 정의를 조회합니다.
    pub fn get(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.workflows.get(name)
    }

    /// 정의된 워크플로우 이름을 정렬 순서로 반환합니다.
    pub fn names(&self) -> Vec<&str> {
        self.workflows.keys().map(String::as_str).collect()
    }

    /// 모든 정의를 정렬 순서로 반환합니다.
    pub fn definitions(&self) -> impl Iterator<Item = &WorkflowDefinition> {
        self.workflows.values()
    }

    /// 정의 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    /// 정의가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
network_audit:
  steps:
    - name: port_scan
      tool: nmap
      options: ["-sV"]
    - name: web_scan
      tool: nikto
brute_force:
  steps:
    - name: ssh_brute
      tool: hydra
      service: ssh
      options: ["-L", "users.txt"]
"#;

    #[test]
    fn parse_valid_yaml() {
        let set = WorkflowSet::parse_yaml(SAMPLE_YAML, "test.yml").unwrap();
        assert_eq!(set.len(), 2);

        let network = set.get("network_audit").unwrap();
        assert_eq!(network.steps.len(), 2);
        assert_eq!(network.steps[0].tool, ToolKind::Nmap);
        assert_eq!(network.steps[0].options, vec!["-sV"]);
        assert_eq!(network.steps[1].options, Vec::<String>::new());

        let brute = set.get("brute_force").unwrap();
        assert_eq!(brute.steps[0].service.as_deref(), Some("ssh"));
    }

    #[test]
    fn parse_invalid_yaml_returns_error() {
        let result = WorkflowSet::parse_yaml("not: [valid: yaml: {{{", "bad.yml");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_tool_skips_definition_only() {
        let yaml = r#"
good:
  steps:
    - name: scan
      tool: nmap
bad:
  steps:
    - name: scan
      tool: nessus
"#;
        let set = WorkflowSet::parse_yaml(yaml, "test.yml").unwrap();
        assert_eq!(set.names(), vec!["good"]);
    }

    #[test]
    fn empty_steps_definition_is_skipped() {
        let yaml = "empty:\n  steps: []\n";
        let set = WorkflowSet::parse_yaml(yaml, "test.yml").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn empty_document_yields_empty_set() {
        let set = WorkflowSet::parse_yaml("", "empty.yml").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn tool_aliases_accepted_in_yaml() {
        let yaml = r#"
exploit_run:
  steps:
    - name: exploit
      tool: msfconsole
      module: exploit/multi/handler
"#;
        let set = WorkflowSet::parse_yaml(yaml, "test.yml").unwrap();
        let step = &set.get("exploit_run").unwrap().steps[0];
        assert_eq!(step.tool, ToolKind::Metasploit);
        assert_eq!(step.module.as_deref(), Some("exploit/multi/handler"));
    }

    #[test]
    fn builtin_set_has_five_workflows() {
        let set = WorkflowSet::builtin();
        assert_eq!(
            set.names(),
            vec![
                "full_recon",
                "network_audit",
                "vulnerability_scan",
                "web_audit",
                "wireless_audit",
            ]
        );
        for definition in set.definitions() {
            definition.validate().unwrap();
        }

        // network_audit은 포트 스캔 후 웹 스캔 순서 고정
        let network = set.get("network_audit").unwrap();
        assert_eq!(network.steps[0].tool, ToolKind::Nmap);
        assert_eq!(network.steps[0].options, vec!["-sV"]);
        assert_eq!(network.steps[1].tool, ToolKind::Nikto);
    }

    #[test]
    fn validate_rejects_empty_name() {
        let definition = WorkflowDefinition {
            name: "  ".to_owned(),
            steps: vec![StepSpec::new("scan", ToolKind::Nmap, vec![])],
        };
        assert!(definition.validate().is_err());
    }

    #[tokio::test]
    async fn load_missing_file_yields_empty_set() {
        let set = WorkflowSet::load("/nonexistent/workflows.yaml").await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflows.yaml");
        tokio::fs::write(&path, SAMPLE_YAML).await.unwrap();

        let set = WorkflowSet::load(&path).await.unwrap();
        assert_eq!(set.len(), 2);
    }
}
