//! 익스플로잇 출력 파서 (metasploit)

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use redpost_core::types::SessionRecord;

use super::ParsedFinding;

static SESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:([Mm]eterpreter)\s+)?[Ss]ession (\d+) (?:created|opened)")
        .unwrap_or_else(|e| panic!("invalid session regex: {e}"))
});

/// msfconsole 출력에서 생성된 세션을 추출합니다.
///
/// 세션 행 앞에 meterpreter 표기가 있으면 유형을 meterpreter로,
/// 없으면 shell로 분류합니다.
pub fn parse_msfconsole(module: &str, output: &str) -> ParsedFinding {
    let sessions = SESSION_RE
        .captures_iter(output)
        .map(|caps| SessionRecord {
            id: caps[2].to_owned(),
            kind: if caps.get(1).is_some() {
                "meterpreter".to_owned()
            } else {
                "shell".to_owned()
            },
        })
        .collect();

    ParsedFinding::Exploit {
        timestamp: Utc::now(),
        module: module.to_owned(),
        sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_shell_sessions() {
        let output = "\
[*] Started reverse TCP handler on 10.0.0.2:4444
[*] Session 1 created in the background.
[*] Session 2 created in the background.
";
        let ParsedFinding::Exploit { sessions, .. } =
            parse_msfconsole("exploit/multi/handler", output)
        else {
            panic!("wrong variant");
        };
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "1");
        assert_eq!(sessions[0].kind, "shell");
        assert_eq!(sessions[1].id, "2");
    }

    #[test]
    fn meterpreter_prefix_sets_kind() {
        let output = "[*] Meterpreter session 3 opened (10.0.0.2:4444 -> 10.0.0.5:49152)";
        let ParsedFinding::Exploit { sessions, .. } =
            parse_msfconsole("exploit/windows/smb/psexec", output)
        else {
            panic!("wrong variant");
        };
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "3");
        assert_eq!(sessions[0].kind, "meterpreter");
    }

    #[test]
    fn no_session_yields_empty() {
        assert!(parse_msfconsole("m", "[-] Exploit completed, but no session was created.")
            .is_empty());
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(output in ".{0,512}") {
            let _ = parse_msfconsole("exploit/multi/handler", &output);
        }
    }
}
