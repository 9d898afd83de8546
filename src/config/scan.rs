//! Profile enumeration and selector-based activation filtering.
//!
//! One bad profile must never block the others: per-profile failures are
//! collected into the outcome instead of being thrown past the scan
//! boundary, and callers decide how loudly to report them.

use std::path::{Path, PathBuf};

use super::{DESCRIPTOR_FILE, Profile};
use crate::context::Context;
use crate::error::ConfigError;

/// Result of one enumeration of the configuration root.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Successfully loaded profiles, lexicographic by name.
    pub profiles: Vec<Profile>,
    /// Per-profile errors collected along the way.
    pub errors: Vec<ConfigError>,
}

/// Enumerate every profile under `root`.
///
/// Immediate subdirectories lacking a `profile.json` are skipped silently
/// so scratch directories can coexist with profiles. Enumeration order is
/// lexicographic by profile name for determinism across runs.
#[must_use]
pub fn list_profiles(root: &Path) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(source) => {
            outcome.errors.push(ConfigError::Io {
                path: root.to_path_buf(),
                source,
            });
            return outcome;
        }
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        if !dir.join(DESCRIPTOR_FILE).is_file() {
            continue;
        }
        match Profile::load(&dir) {
            Ok(profile) => outcome.profiles.push(profile),
            Err(err) => outcome.errors.push(err),
        }
    }

    outcome
}

/// Enumerate the profiles whose selector holds in `ctx`.
///
/// Profiles that failed to load are reported in the outcome's errors and
/// never activate; the successfully loaded remainder is still returned.
#[must_use]
pub fn active_profiles(root: &Path, ctx: &dyn Context) -> ScanOutcome {
    let mut outcome = list_profiles(root);
    outcome.profiles.retain(|profile| profile.is_active(ctx));
    outcome
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::context::FakeContext;

    fn write_profile(root: &Path, name: &str, descriptor: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).expect("create profile dir");
        std::fs::write(dir.join(DESCRIPTOR_FILE), descriptor).expect("write descriptor");
    }

    #[test]
    fn profiles_are_listed_in_lexicographic_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_profile(tmp.path(), "zeta", "{}");
        write_profile(tmp.path(), "alpha", "{}");
        write_profile(tmp.path(), "mid", "{}");

        let outcome = list_profiles(tmp.path());
        let names: Vec<&str> = outcome.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn directories_without_descriptor_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_profile(tmp.path(), "real", "{}");
        std::fs::create_dir_all(tmp.path().join("scratch")).unwrap();
        // stray files at the root are not profiles either
        std::fs::write(tmp.path().join("README"), "notes").unwrap();

        let outcome = list_profiles(tmp.path());
        assert_eq!(outcome.profiles.len(), 1);
        assert_eq!(outcome.profiles[0].name, "real");
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn malformed_profile_is_collected_and_others_still_load() {
        let tmp = tempfile::tempdir().unwrap();
        write_profile(tmp.path(), "a", "{}");
        write_profile(tmp.path(), "b", "{}");
        write_profile(tmp.path(), "c", "{broken");

        let outcome = list_profiles(tmp.path());
        let names: Vec<&str> = outcome.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].to_string().contains('c'));
    }

    #[test]
    fn missing_root_reports_a_single_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = list_profiles(&tmp.path().join("nope"));
        assert!(outcome.profiles.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], ConfigError::Io { .. }));
    }

    #[test]
    fn active_profiles_filters_by_selector() {
        let tmp = tempfile::tempdir().unwrap();
        write_profile(
            tmp.path(),
            "a",
            r#"{"selectors": {"host": "devbox"}, "path": ["bin"]}"#,
        );
        write_profile(tmp.path(), "b", r#"{"env": {"EDITOR": "vim"}}"#);
        write_profile(tmp.path(), "other", r#"{"selectors": {"host": "elsewhere"}}"#);

        let ctx = FakeContext::new().with_hostname("devbox");
        let outcome = active_profiles(tmp.path(), &ctx);
        let names: Vec<&str> = outcome.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn active_profiles_still_returns_valid_ones_next_to_failures() {
        let tmp = tempfile::tempdir().unwrap();
        write_profile(tmp.path(), "good", "{}");
        write_profile(tmp.path(), "typo", r#"{"selectors": {"hots": "x"}}"#);

        let outcome = active_profiles(tmp.path(), &FakeContext::new());
        assert_eq!(outcome.profiles.len(), 1);
        assert_eq!(outcome.profiles[0].name, "good");
        assert_eq!(outcome.errors.len(), 1);
    }
}
