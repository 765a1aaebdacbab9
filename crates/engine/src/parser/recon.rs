//! 정찰 스캔 출력 파서 (nmap)

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use redpost_core::types::{HostRecord, PortRecord};

use super::ParsedFinding;

static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Nmap scan report for ([\w.-]+)(?:[ \t]+\(([\d.]+)\))?")
        .unwrap_or_else(|e| panic!("invalid host regex: {e}"))
});

static PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\d+)/(\w+)[ \t]+(\w+)[ \t]+([\w-]+)(?:[ \t]+(.+))?$")
        .unwrap_or_else(|e| panic!("invalid port regex: {e}"))
});

/// nmap 출력에서 호스트와 포트를 추출합니다.
///
/// 역방향 조회가 실패해 괄호 안 IP가 없는 행은 호스트명을 IP로
/// 그대로 사용합니다. 포트 번호가 u16 범위를 벗어나는 행은 버립니다.
pub fn parse_nmap(target: &str, output: &str) -> ParsedFinding {
    let mut hosts = Vec::new();
    let mut ports = Vec::new();

    for caps in HOST_RE.captures_iter(output) {
        let hostname = caps[1].to_owned();
        let ip = caps
            .get(2)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_else(|| hostname.clone());
        hosts.push(HostRecord { hostname, ip });
    }

    for caps in PORT_RE.captures_iter(output) {
        let Ok(port) = caps[1].parse::<u16>() else {
            continue;
        };
        ports.push(PortRecord {
            port,
            protocol: caps[2].to_owned(),
            state: caps[3].to_owned(),
            service: caps[4].to_owned(),
            info: caps.get(5).map(|m| m.as_str().trim_end().to_owned()),
        });
    }

    ParsedFinding::Recon {
        timestamp: Utc::now(),
        target: target.to_owned(),
        hosts,
        ports,
    }
}
