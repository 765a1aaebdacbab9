//! 무선 크랙 출력 파서 (aircrack-ng)

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use super::ParsedFinding;

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"KEY FOUND! \[ (.*?) \]").unwrap_or_else(|e| panic!("invalid key regex: {e}"))
});

/// aircrack-ng 출력에서 크랙된 키를 추출합니다.
pub fn parse_aircrack(capture_file: &str, output: &str) -> ParsedFinding {
    let keys = KEY_RE
        .captures_iter(output)
        .map(|caps| caps[1].to_owned())
        .collect();

    ParsedFinding::Wireless {
        timestamp: Utc::now(),
        capture_file: capture_file.to_owned(),
        keys,
    }
}
