//! 설정 관리 — redpost.toml 파싱 및 런타임 설정
//!
//! [`RedpostConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`REDPOST_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`redpost.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), redpost_core::error::RedpostError> {
//! use redpost_core::config::RedpostConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = RedpostConfig::load("redpost.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = RedpostConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RedpostError};

/// Redpost 통합 설정
///
/// `redpost.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedpostConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 도구 레지스트리 설정
    #[serde(default)]
    pub tools: ToolsConfig,
    /// 워크플로우 설정
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// 명령 정책 설정
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl RedpostConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RedpostError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RedpostError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RedpostError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RedpostError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, RedpostError> {
        toml::from_str(toml_str).map_err(|e| {
            RedpostError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `REDPOST_{SECTION}_{FIELD}`
    /// 예: `REDPOST_WORKFLOW_DEFINITIONS_PATH=/etc/redpost/workflows.yaml`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "REDPOST_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "REDPOST_GENERAL_LOG_FORMAT");

        // Tools
        override_csv(&mut self.tools.search_dirs, "REDPOST_TOOLS_SEARCH_DIRS");

        // Workflow
        override_opt_string(
            &mut self.workflow.definitions_path,
            "REDPOST_WORKFLOW_DEFINITIONS_PATH",
        );
        override_string(
            &mut self.workflow.default_workflow,
            "REDPOST_WORKFLOW_DEFAULT_WORKFLOW",
        );

        // Policy
        override_string(&mut self.policy.mode, "REDPOST_POLICY_MODE");
        override_csv(
            &mut self.policy.allowed_commands,
            "REDPOST_POLICY_ALLOWED_COMMANDS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), RedpostError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // policy.mode 검증
        let valid_modes = ["allow_all", "allowlist"];
        if !valid_modes.contains(&self.policy.mode.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "policy.mode".to_owned(),
                reason: format!("must be one of: {}", valid_modes.join(", ")),
            }
            .into());
        }

        // allowlist 모드인데 허용 명령이 비어 있으면 모든 도구 실행이 거부되므로 거부
        if self.policy.mode == "allowlist" && self.policy.allowed_commands.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "policy.allowed_commands".to_owned(),
                reason: "must not be empty when policy.mode is 'allowlist'".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 도구 레지스트리 설정
///
/// 논리 도구 이름별 기본 실행 파일 경로와, 기본 경로에 없을 때
/// 탐색할 디렉토리 목록을 정의합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// 도구별 기본 실행 파일 경로 (논리 이름 -> 경로)
    pub default_paths: BTreeMap<String, String>,
    /// 기본 경로 부재 시 탐색할 디렉토리 (순서대로 첫 매치 우선)
    pub search_dirs: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let default_paths = [
            ("nmap", "/usr/bin/nmap"),
            ("metasploit", "/usr/bin/msfconsole"),
            ("wireshark", "/usr/bin/wireshark"),
            ("burpsuite", "/usr/bin/burpsuite"),
            ("sqlmap", "/usr/bin/sqlmap"),
            ("hydra", "/usr/bin/hydra"),
            ("john", "/usr/bin/john"),
            ("aircrack-ng", "/usr/bin/aircrack-ng"),
            ("nikto", "/usr/bin/nikto"),
            ("gobuster", "/usr/bin/gobuster"),
            ("wpscan", "/usr/bin/wpscan"),
            ("hashcat", "/usr/bin/hashcat"),
            ("whatweb", "/usr/bin/whatweb"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_owned(), path.to_owned()))
        .collect();

        Self {
            default_paths,
            search_dirs: vec![
                "/usr/bin".to_owned(),
                "/usr/local/bin".to_owned(),
                "/opt/kali/bin".to_owned(),
            ],
        }
    }
}

/// 워크플로우 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// 워크플로우 정의 YAML 파일 경로 (없으면 내장 정의 사용)
    pub definitions_path: Option<String>,
    /// `run`에서 워크플로우 이름 생략 시 사용할 기본 워크플로우
    pub default_workflow: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            definitions_path: None,
            default_workflow: "network_audit".to_owned(),
        }
    }
}

/// 명령 정책 설정
///
/// 도구 실행 전 정책 게이트가 사용할 허용 규칙입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// 정책 모드 (allow_all, allowlist)
    pub mode: String,
    /// allowlist 모드에서 허용할 명령 이름 목록
    pub allowed_commands: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mode: "allow_all".to_owned(),
            allowed_commands: Vec::new(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_opt_string(target: &mut Option<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = Some(val);
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = RedpostConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.policy.mode, "allow_all");
        assert!(config.workflow.definitions_path.is_none());
        assert_eq!(config.workflow.default_workflow, "network_audit");
        assert_eq!(config.tools.default_paths["nmap"], "/usr/bin/nmap");
        assert_eq!(
            config.tools.default_paths["metasploit"],
            "/usr/bin/msfconsole"
        );
        assert_eq!(config.tools.search_dirs[0], "/usr/bin");
    }

    #[test]
    fn default_config_passes_validation() {
        let config = RedpostConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = RedpostConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.tools.default_paths.contains_key("hydra"));
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[policy]
mode = "allowlist"
allowed_commands = ["nmap", "nikto"]
"#;
        let config = RedpostConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.policy.mode, "allowlist");
        assert_eq!(config.policy.allowed_commands, vec!["nmap", "nikto"]);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "json"

[tools]
search_dirs = ["/usr/bin", "/opt/tools/bin"]

[tools.default_paths]
nmap = "/opt/tools/bin/nmap"

[workflow]
definitions_path = "/etc/redpost/workflows.yaml"
default_workflow = "full_recon"

[policy]
mode = "allowlist"
allowed_commands = ["nmap"]
"#;
        let config = RedpostConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.tools.search_dirs.len(), 2);
        // default_paths 테이블을 명시하면 기본 맵 전체를 대체
        assert_eq!(config.tools.default_paths.len(), 1);
        assert_eq!(
            config.workflow.definitions_path.as_deref(),
            Some("/etc/redpost/workflows.yaml")
        );
        assert_eq!(config.workflow.default_workflow, "full_recon");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let result = RedpostConfig::parse("invalid = [[[toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            RedpostError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = RedpostConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = RedpostConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_invalid_policy_mode() {
        let mut config = RedpostConfig::default();
        config.policy.mode = "denylist".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("policy.mode"));
    }

    #[test]
    fn validate_rejects_empty_allowlist() {
        let mut config = RedpostConfig::default();
        config.policy.mode = "allowlist".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("allowed_commands"));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_REDPOST_STR", "overridden") };
        override_string(&mut val, "TEST_REDPOST_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_REDPOST_STR") };
    }

    #[test]
    fn env_override_opt_string() {
        let mut val: Option<String> = None;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_REDPOST_OPT", "/tmp/workflows.yaml") };
        override_opt_string(&mut val, "TEST_REDPOST_OPT");
        assert_eq!(val.as_deref(), Some("/tmp/workflows.yaml"));
        unsafe { std::env::remove_var("TEST_REDPOST_OPT") };
    }

    #[test]
    fn env_override_csv() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_REDPOST_CSV", "x, y, z") };
        override_csv(&mut val, "TEST_REDPOST_CSV");
        assert_eq!(val, vec!["x", "y", "z"]);
        unsafe { std::env::remove_var("TEST_REDPOST_CSV") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_REDPOST_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = RedpostConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = RedpostConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(
            config.workflow.default_workflow,
            parsed.workflow.default_workflow
        );
        assert_eq!(
            config.tools.default_paths.len(),
            parsed.tools.default_paths.len()
        );
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = RedpostConfig::from_file("/nonexistent/path/redpost.toml").await;
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            RedpostError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
