//! 웹 스캔 출력 파서 (whatweb, nikto, sqlmap)

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use redpost_core::types::WebFinding;

use super::ParsedFinding;

static TECH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(.*?)\]").unwrap_or_else(|e| panic!("invalid technology regex: {e}"))
});

static NIKTO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+ (.*?):\s+(.*)").unwrap_or_else(|e| panic!("invalid nikto regex: {e}"))
});

/// sqlmap이 인젝션 포인트 발견을 알리는 마커 문자열
const SQLMAP_INJECTION_MARKER: &str = "sqlmap identified the following injection point";

/// whatweb 출력에서 대괄호로 표기된 기술 스택을 추출합니다.
pub fn parse_whatweb(target: &str, output: &str) -> ParsedFinding {
    let technologies = TECH_RE
        .captures_iter(output)
        .map(|caps| caps[1].to_owned())
        .collect();

    ParsedFinding::Web {
        timestamp: Utc::now(),
        target: target.to_owned(),
        technologies,
        vulnerabilities: Vec::new(),
    }
}

/// nikto 출력의 `+ 식별자: 설명` 행을 취약점으로 추출합니다.
pub fn parse_nikto(target: &str, output: &str) -> ParsedFinding {
    let vulnerabilities = NIKTO_RE
        .captures_iter(output)
        .map(|caps| WebFinding {
            id: caps[1].to_owned(),
            description: caps[2].trim_end().to_owned(),
        })
        .collect();

    ParsedFinding::Web {
        timestamp: Utc::now(),
        target: target.to_owned(),
        technologies: Vec::new(),
        vulnerabilities,
    }
}

/// sqlmap 출력에서 인젝션 포인트 마커를 찾습니다.
///
/// 마커가 있으면 단일 SQL Injection 취약점으로 기록합니다.
pub fn parse_sqlmap(target: &str, output: &str) -> ParsedFinding {
    let mut vulnerabilities = Vec::new();
    if output.contains(SQLMAP_INJECTION_MARKER) {
        vulnerabilities.push(WebFinding {
            id: "SQL Injection".to_owned(),
            description: "SQL Injection vulnerability found".to_owned(),
        });
    }

    ParsedFinding::Web {
        timestamp: Utc::now(),
        target: target.to_owned(),
        technologies: Vec::new(),
        vulnerabilities,
    }
}
