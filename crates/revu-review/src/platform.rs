//! Platform detection
//!
//! Classifies a PR's target platform from the repository name, falling back
//! to scoring the changed file paths. The checklist text is handed to the AI
//! collaborator alongside the sanitized diff.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Backend,
    Unknown,
}

const ANDROID_REPO_HINTS: &[&str] = &["android"];
const IOS_REPO_HINTS: &[&str] = &["ios"];
const BACKEND_REPO_HINTS: &[&str] = &[
    "service", "api", "backend", "server", "gateway", "auth", "billing", "payment",
];

const ANDROID_FILE_HINTS: &[&str] = &[".kt", ".kts", "build.gradle", "AndroidManifest.xml"];
const IOS_FILE_HINTS: &[&str] = &[".swift", ".m", "Info.plist", "Podfile", "Package.swift"];
const BACKEND_FILE_HINTS: &[&str] = &[
    ".py", ".go", ".rb", ".ts", "Dockerfile", "requirements.txt", "package.json", "pom.xml",
];

impl Platform {
    pub fn detect(repository: &str, changed_files: &[String]) -> Self {
        let repo = repository.to_lowercase();

        if ANDROID_REPO_HINTS.iter().any(|h| repo.contains(h)) {
            return Platform::Android;
        }
        if IOS_REPO_HINTS.iter().any(|h| repo.contains(h)) {
            return Platform::Ios;
        }
        if BACKEND_REPO_HINTS.iter().any(|h| repo.contains(h)) {
            return Platform::Backend;
        }

        Self::detect_from_files(changed_files)
    }

    fn detect_from_files(changed_files: &[String]) -> Self {
        let score = |hints: &[&str]| {
            changed_files
                .iter()
                .filter(|f| hints.iter().any(|h| f.ends_with(h) || f.contains(h)))
                .count()
        };

        let android = score(ANDROID_FILE_HINTS);
        let ios = score(IOS_FILE_HINTS);
        let backend = score(BACKEND_FILE_HINTS);

        let max = android.max(ios).max(backend);
        if max == 0 {
            Platform::Unknown
        } else if max == android {
            Platform::Android
        } else if max == ios {
            Platform::Ios
        } else {
            Platform::Backend
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Backend => "Backend",
            Platform::Unknown => "Unknown",
        }
    }

    /// Platform-specific review checklist for the AI collaborator.
    pub fn checklist(&self) -> &'static str {
        match self {
            Platform::Android => {
                "- Lifecycle handling in activities/fragments\n\
                 - Coroutine scoping and cancellation\n\
                 - Nullability annotations on public APIs\n\
                 - Resource leaks (cursors, listeners, receivers)"
            }
            Platform::Ios => {
                "- Force unwrapping and force casting\n\
                 - Retain cycles in closures and delegates\n\
                 - Main-thread UI updates\n\
                 - Optional binding over implicit unwrap"
            }
            Platform::Backend => {
                "- Input validation at API boundaries\n\
                 - SQL/query construction and injection risk\n\
                 - Error propagation and retry behavior\n\
                 - Secrets kept out of code and logs"
            }
            Platform::Unknown => {
                "- Correctness of the changed logic\n\
                 - Error handling on failure paths\n\
                 - Test coverage for the change"
            }
        }
    }
}
