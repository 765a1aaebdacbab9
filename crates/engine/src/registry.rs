//! 도구 레지스트리 — 논리 도구 이름을 실행 파일 경로로 해석합니다.
//!
//! 해석은 레지스트리 구성 시점에 한 번만 수행됩니다. 설정된 기본 경로를
//! 먼저 확인하고, 없으면 탐색 디렉토리를 순서대로 확인하여 첫 매치를
//! 사용합니다. 어디서도 찾지 못한 도구는 에러가 아니라 "사용 불가"로
//! 기록됩니다 (경로 없는 디스크립터).
//!
//! 레지스트리는 구성 후 불변이며, 러너에 명시적으로 주입됩니다.
//! 파일시스템 접근은 [`ProbeFs`] trait 뒤에 있어 테스트에서 가짜
//! 파일시스템을 주입할 수 있습니다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use redpost_core::config::ToolsConfig;
use redpost_core::types::ToolCategory;

/// 해석된 도구 디스크립터
///
/// 레지스트리 구성 후 불변입니다. `path`가 `None`이면 도구를 찾지 못한 것입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// 논리 도구 이름
    pub name: String,
    /// 해석된 실행 파일 경로 (없으면 사용 불가)
    pub path: Option<PathBuf>,
    /// 도구 분류
    pub category: ToolCategory,
}

impl ToolDescriptor {
    /// 도구가 실행 가능한 상태인지 확인합니다.
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Filesystem probe seam.
///
/// Production code uses [`SystemFs`]; tests inject a fake filesystem so
/// registry resolution can be exercised without touching the real disk.
pub trait ProbeFs: Send + Sync {
    /// Returns true when `path` exists as a regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// 실제 파일시스템을 확인하는 프로덕션 구현
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl ProbeFs for SystemFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// 도구 레지스트리
///
/// 논리 도구 이름 → [`ToolDescriptor`] 매핑을 소유합니다.
/// 구성 후 재탐색은 일어나지 않습니다.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// 설정을 기반으로 실제 파일시스템을 탐색하여 레지스트리를 구성합니다.
    pub fn probe(config: &ToolsConfig) -> Self {
        Self::probe_with(config, &SystemFs)
    }

    /// 주입된 파일시스템으로 레지스트리를 구성합니다.
    ///
    /// 해석 순서: 설정된 기본 경로 → 탐색 디렉토리 순회 (첫 매치 우선).
    /// 실행 파일명은 기본 경로의 파일명을 따릅니다. 논리 이름과 실행
    /// 파일명이 다른 도구(metasploit → msfconsole)를 처리하기 위함입니다.
    pub fn probe_with(config: &ToolsConfig, fs: &dyn ProbeFs) -> Self {
        let mut tools = HashMap::with_capacity(config.default_paths.len());

        for (name, default_path) in &config.default_paths {
            let default_path = PathBuf::from(default_path);
            let executable = default_path
                .file_name()
                .map(|n| n.to_owned())
                .unwrap_or_else(|| name.into());

            let mut resolved = None;

            if fs.is_file(&default_path) {
                resolved = Some(default_path);
            } else {
                for dir in &config.search_dirs {
                    let candidate = Path::new(dir).join(&executable);
                    if fs.is_file(&candidate) {
                        resolved = Some(candidate);
                        break;
                    }
                }
            }

            match &resolved {
                Some(path) => debug!(tool = %name, path = %path.display(), "tool resolved"),
                None => debug!(tool = %name, "tool not found, recorded as unavailable"),
            }

            tools.insert(
                name.clone(),
                ToolDescriptor {
                    name: name.clone(),
                    path: resolved,
                    category: ToolCategory::for_tool(name),
                },
            );
        }

        Self { tools }
    }

    /// 논리 이름으로 디스크립터를 조회합니다.
    ///
    /// 설정에 없는 이름은 `None`을 반환합니다.
    pub fn resolve(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// 도구가 실행 가능한 상태인지 확인합니다.
    pub fn is_available(&self, name: &str) -> bool {
        self.tools.get(name).is_some_and(ToolDescriptor::is_available)
    }

    /// 사용 가능한 도구 이름 목록을 정렬하여 반환합니다.
    pub fn available_tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tools
            .values()
            .filter(|d| d.is_available())
            .map(|d| d.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// 도구의 분류를 반환합니다.
    ///
    /// 설정에 없는 이름도 분류 규칙으로 판정합니다
    /// (알려지지 않은 도구는 `Uncategorized`).
    pub fn category_of(&self, name: &str) -> ToolCategory {
        self.tools
            .get(name)
            .map(|d| d.category)
            .unwrap_or_else(|| ToolCategory::for_tool(name))
    }

    /// 등록된 모든 디스크립터를 이름순으로 반환합니다.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        let mut all: Vec<&ToolDescriptor> = self.tools.values().collect();
        all.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// 지정된 경로만 존재한다고 응답하는 가짜 파일시스템
    struct FakeFs {
        files: HashSet<PathBuf>,
    }

    impl FakeFs {
        fn with_files(paths: &[&str]) -> Self {
            Self {
                files: paths.iter().map(PathBuf::from).collect(),
            }
        }
    }

    impl ProbeFs for FakeFs {
        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
    }

    fn test_config() -> ToolsConfig {
        let mut config = ToolsConfig::default();
        config.search_dirs = vec!["/usr/bin".to_owned(), "/opt/kali/bin".to_owned()];
        config
    }

    #[test]
    fn default_path_wins() {
        let fs = FakeFs::with_files(&["/usr/bin/nmap"]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        let descriptor = registry.resolve("nmap").unwrap();
        assert_eq!(descriptor.path.as_deref(), Some(Path::new("/usr/bin/nmap")));
        assert!(registry.is_available("nmap"));
    }

    #[test]
    fn falls_back_to_search_dirs_in_order() {
        let mut config = test_config();
        config
            .default_paths
            .insert("nmap".to_owned(), "/nonexistent/nmap".to_owned());
        // 두 탐색 디렉토리 모두에 존재: 첫 번째가 이겨야 함
        let fs = FakeFs::with_files(&["/usr/bin/nmap", "/opt/kali/bin/nmap"]);
        let registry = ToolRegistry::probe_with(&config, &fs);

        let descriptor = registry.resolve("nmap").unwrap();
        assert_eq!(descriptor.path.as_deref(), Some(Path::new("/usr/bin/nmap")));
    }

    #[test]
    fn unresolved_tool_is_unavailable_not_error() {
        let fs = FakeFs::with_files(&[]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        let descriptor = registry.resolve("nikto").unwrap();
        assert!(descriptor.path.is_none());
        assert!(!registry.is_available("nikto"));
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let fs = FakeFs::with_files(&[]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        assert!(registry.resolve("netcat").is_none());
        assert!(!registry.is_available("netcat"));
    }

    #[test]
    fn metasploit_probes_msfconsole_executable() {
        let fs = FakeFs::with_files(&["/opt/kali/bin/msfconsole"]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        let descriptor = registry.resolve("metasploit").unwrap();
        assert_eq!(
            descriptor.path.as_deref(),
            Some(Path::new("/opt/kali/bin/msfconsole"))
        );
    }

    #[test]
    fn available_tools_is_sorted() {
        let fs = FakeFs::with_files(&["/usr/bin/nmap", "/usr/bin/hydra", "/usr/bin/nikto"]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        assert_eq!(registry.available_tools(), vec!["hydra", "nikto", "nmap"]);
    }

    #[test]
    fn category_of_known_and_unknown() {
        let fs = FakeFs::with_files(&[]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        assert_eq!(
            registry.category_of("nmap"),
            ToolCategory::InformationGathering
        );
        assert_eq!(registry.category_of("netcat"), ToolCategory::Uncategorized);
    }

    #[test]
    fn descriptors_sorted_by_name() {
        let fs = FakeFs::with_files(&[]);
        let registry = ToolRegistry::probe_with(&test_config(), &fs);

        let names: Vec<&str> = registry.descriptors().iter().map(|d| d.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"nmap"));
    }

    #[test]
    fn system_fs_reports_missing_path() {
        let fs = SystemFs;
        assert!(!fs.is_file(Path::new("/nonexistent/redpost/tool-12345")));
    }
}
