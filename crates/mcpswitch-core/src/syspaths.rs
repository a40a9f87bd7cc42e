//! System PATH directory detection.
//!
//! Produces the system-detected half of the extra-PATH sequence handed to
//! stdio probes. On unix this reads `/etc/paths` and `/etc/paths.d/*` (the
//! login-shell PATH sources that GUI-launched and minimal environments
//! miss); on windows the `PATH` variable itself is the source of truth.

#[cfg(unix)]
use crate::store::expand_home;
use std::collections::HashSet;
use std::path::Path;

/// Detect system PATH directories, deduplicated preserving order.
///
/// This is the single dedup point for the extra-PATH sequence; callers may
/// append user directories without re-deduplicating.
#[must_use]
pub fn detect_system_paths() -> Vec<String> {
    dedup(collect_platform_dirs())
}

#[cfg(unix)]
fn collect_platform_dirs() -> Vec<String> {
    let mut dirs = Vec::new();

    if let Ok(contents) = std::fs::read_to_string("/etc/paths") {
        push_lines(&mut dirs, &contents);
    }

    if let Ok(entries) = std::fs::read_dir("/etc/paths.d") {
        for entry in entries.flatten() {
            if let Ok(contents) = std::fs::read_to_string(entry.path()) {
                push_lines(&mut dirs, &contents);
            }
        }
    }

    dirs
}

#[cfg(not(unix))]
fn collect_platform_dirs() -> Vec<String> {
    std::env::var("PATH")
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(unix)]
fn push_lines(dirs: &mut Vec<String>, contents: &str) {
    for line in contents.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('#') {
            dirs.push(expand_home(trimmed).display().to_string());
        }
    }
}

fn dedup(dirs: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    dirs.into_iter()
        .filter(|dir| seen.insert(dir.clone()))
        .collect()
}

/// Whether a detected directory actually exists on disk.
///
/// Detection is advisory; the presentation layer uses this to flag stale
/// entries without filtering them out of probe PATHs.
#[must_use]
pub fn dir_exists(dir: &str) -> bool {
    Path::new(dir).is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_preserves_first_occurrence_order() {
        let dirs = vec![
            "/usr/local/bin".to_string(),
            "/usr/bin".to_string(),
            "/usr/local/bin".to_string(),
            "/bin".to_string(),
        ];
        assert_eq!(dedup(dirs), vec!["/usr/local/bin", "/usr/bin", "/bin"]);
    }

    #[test]
    fn detect_returns_no_duplicates() {
        let dirs = detect_system_paths();
        let unique: HashSet<&String> = dirs.iter().collect();
        assert_eq!(unique.len(), dirs.len());
    }

    #[cfg(unix)]
    #[test]
    fn push_lines_skips_blanks_and_comments() {
        let mut dirs = Vec::new();
        push_lines(&mut dirs, "/usr/bin\n\n# comment\n  /usr/local/bin  \n");
        assert_eq!(dirs, vec!["/usr/bin", "/usr/local/bin"]);
    }
}
