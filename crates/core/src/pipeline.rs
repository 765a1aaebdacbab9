//! 확장 포인트 trait — 실행 정책과 플랫폼 명령 변환
//!
//! 엔진은 도구를 실행하기 직전 두 협력자를 거칩니다.
//! [`CommandFormatter`]가 논리 명령을 플랫폼에 맞는 명령줄로 변환하고,
//! [`CommandPolicy`]가 최종 명령줄의 실행 허용 여부를 판정합니다.
//! 거부는 예외가 아니라 스텝 실패 데이터로 표현됩니다.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 실행 가능한 명령줄
///
/// 포매터의 출력이자 정책 판정과 감사 로그의 입력입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// 실행 파일 경로
    pub program: PathBuf,
    /// 인자 목록
    pub args: Vec<String>,
}

impl CommandLine {
    /// 새 명령줄을 생성합니다.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// 명령 실행 정책을 구현하는 trait
///
/// 스폰 직전에 완성된 명령줄 문자열로 호출됩니다.
pub trait CommandPolicy: Send + Sync {
    /// 정책 이름
    fn name(&self) -> &str;

    /// 명령 실행 허용 여부를 판정
    fn allow(&self, command: &str) -> bool;
}

/// 플랫폼별 명령 변환을 구현하는 trait
///
/// 엔진은 변환 결과가 스폰 가능한 명령줄이기만 하면
/// 어떤 치환이 일어났는지 관여하지 않습니다.
pub trait CommandFormatter: Send + Sync {
    /// 논리 명령을 플랫폼 명령줄로 변환
    fn format(&self, program: &Path, args: &[String]) -> CommandLine;
}

/// 모든 명령을 허용하는 기본 정책
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

impl CommandPolicy for AllowAllPolicy {
    fn name(&self) -> &str {
        "allow_all"
    }

    fn allow(&self, _command: &str) -> bool {
        true
    }
}

/// 허용 목록 기반 정책
///
/// 명령줄의 첫 토큰(실행 파일)의 파일명이 허용 목록에 있어야 통과합니다.
#[derive(Debug, Clone, Default)]
pub struct AllowlistPolicy {
    allowed: Vec<String>,
}

impl AllowlistPolicy {
    /// 허용할 명령 이름 목록으로 정책을 생성합니다.
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    fn command_name(command: &str) -> Option<&str> {
        let first = command.split_whitespace().next()?;
        Some(
            Path::new(first)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(first),
        )
    }
}

impl CommandPolicy for AllowlistPolicy {
    fn name(&self) -> &str {
        "allowlist"
    }

    fn allow(&self, command: &str) -> bool {
        match Self::command_name(command) {
            Some(name) => self.allowed.iter().any(|a| a == name),
            None => false,
        }
    }
}

/// 변환 없이 그대로 통과시키는 기본 포매터
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFormatter;

impl CommandFormatter for NativeFormatter {
    fn format(&self, program: &Path, args: &[String]) -> CommandLine {
        CommandLine::new(program, args.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_display_joins_tokens() {
        let cmd = CommandLine::new(
            "/usr/bin/nmap",
            vec!["-sV".to_owned(), "10.0.0.5".to_owned()],
        );
        assert_eq!(cmd.to_string(), "/usr/bin/nmap -sV 10.0.0.5");
    }

    #[test]
    fn command_line_display_without_args() {
        let cmd = CommandLine::new("/usr/bin/nikto", vec![]);
        assert_eq!(cmd.to_string(), "/usr/bin/nikto");
    }

    #[test]
    fn allow_all_policy_allows_anything() {
        let policy = AllowAllPolicy;
        assert_eq!(policy.name(), "allow_all");
        assert!(policy.allow("/usr/bin/nmap -sV 10.0.0.5"));
        assert!(policy.allow(""));
    }

    #[test]
    fn allowlist_policy_matches_basename() {
        let policy = AllowlistPolicy::new(vec!["nmap".to_owned(), "nikto".to_owned()]);
        assert!(policy.allow("/usr/bin/nmap -sV 10.0.0.5"));
        assert!(policy.allow("nikto -h 10.0.0.5"));
        assert!(!policy.allow("/usr/bin/hydra -s ssh 10.0.0.5"));
    }

    #[test]
    fn allowlist_policy_rejects_empty_command() {
        let policy = AllowlistPolicy::new(vec!["nmap".to_owned()]);
        assert!(!policy.allow(""));
        assert!(!policy.allow("   "));
    }

    #[test]
    fn native_formatter_is_passthrough() {
        let formatter = NativeFormatter;
        let cmd = formatter.format(Path::new("/usr/bin/nmap"), &["-sV".to_owned()]);
        assert_eq!(cmd.program, PathBuf::from("/usr/bin/nmap"));
        assert_eq!(cmd.args, vec!["-sV".to_owned()]);
    }

    #[test]
    fn command_line_serialize_roundtrip() {
        let cmd = CommandLine::new("/usr/bin/hydra", vec!["-s".to_owned(), "ssh".to_owned()]);
        let json = serde_json::to_string(&cmd).unwrap();
        let parsed: CommandLine = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, parsed);
    }
}
