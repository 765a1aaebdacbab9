//! 도구 출력 파서 — 원시 텍스트에서 구조화된 발견 사항 추출
//!
//! 파서는 전부 무상태 순수 함수입니다. 실패하지 않으며, 인식할 수 없는
//! 입력에는 빈 컬렉션을 반환합니다. 도구가 출력 형식을 바꾸면 발견
//! 사항이 줄어들 뿐 에러가 되지 않습니다. 정규식은 `LazyLock`으로
//! 프로세스당 한 번만 컴파일됩니다.
//!
//! 추출 순서는 원시 출력의 등장 순서를 보존합니다. 리포트 집계가
//! 스텝 순서에 의존하기 때문입니다.

pub mod credential;
pub mod exploit;
pub mod recon;
pub mod web;
pub mod wireless;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use redpost_core::types::{
    CredentialRecord, HostRecord, PortRecord, SessionRecord, WebFinding,
};

pub use credential::parse_hydra;
pub use exploit::parse_msfconsole;
pub use recon::parse_nmap;
pub use web::{parse_nikto, parse_sqlmap, parse_whatweb};
pub use wireless::parse_aircrack;

/// 도구 계열별 파싱 결과
///
/// 각 variant는 파싱 시각과 대상 식별자, 그리고 순서가 보존된
/// 발견 사항 컬렉션을 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ParsedFinding {
    /// 정찰 스캔 (nmap)
    Recon {
        timestamp: DateTime<Utc>,
        target: String,
        hosts: Vec<HostRecord>,
        ports: Vec<PortRecord>,
    },
    /// 웹 스캔 (whatweb, nikto, sqlmap)
    Web {
        timestamp: DateTime<Utc>,
        target: String,
        technologies: Vec<String>,
        vulnerabilities: Vec<WebFinding>,
    },
    /// 자격증명 공격 (hydra)
    Credential {
        timestamp: DateTime<Utc>,
        target: String,
        service: String,
        credentials: Vec<CredentialRecord>,
    },
    /// 익스플로잇 실행 (metasploit)
    Exploit {
        timestamp: DateTime<Utc>,
        module: String,
        sessions: Vec<SessionRecord>,
    },
    /// 무선 키 크랙 (aircrack-ng)
    Wireless {
        timestamp: DateTime<Utc>,
        capture_file: String,
        keys: Vec<String>,
    },
}

impl ParsedFinding {
    /// 추출된 발견 사항이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Recon { hosts, ports, .. } => hosts.is_empty() && ports.is_empty(),
            Self::Web {
                technologies,
                vulnerabilities,
                ..
            } => technologies.is_empty() && vulnerabilities.is_empty(),
            Self::Credential { credentials, .. } => credentials.is_empty(),
            Self::Exploit { sessions, .. } => sessions.is_empty(),
            Self::Wireless { keys, .. } => keys.is_empty(),
        }
    }

    /// 파싱 대상 식별자 (호스트, 모듈명, 캡처 파일 등)를 반환합니다.
    pub fn subject(&self) -> &str {
        match self {
            Self::Recon { target, .. }
            | Self::Web { target, .. }
            | Self::Credential { target, .. } => target,
            Self::Exploit { module, .. } => module,
            Self::Wireless { capture_file, .. } => capture_file,
        }
    }
}
