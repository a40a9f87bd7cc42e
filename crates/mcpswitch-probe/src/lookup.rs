//! PATH-aware command lookup.
//!
//! Builds the extended PATH handed to child processes and answers the cheap
//! "does this command exist" question asked before a stdio probe, so a
//! missing executable fails fast instead of waiting out the handshake
//! deadline. Environment and filesystem access sit behind traits so the
//! search order is testable without touching the real system.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Platform-specific PATH separator.
#[cfg(unix)]
pub const PATH_SEPARATOR: &str = ":";
#[cfg(windows)]
pub const PATH_SEPARATOR: &str = ";";

/// Trait for environment variable access (injectable for testing).
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<OsString>;
}

/// Production environment provider reading the process environment.
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        env::var_os(key)
    }
}

/// Trait for executable checks (injectable for testing).
pub trait FsProvider {
    /// Whether the path exists, is a file, and is runnable.
    fn is_executable(&self, path: &Path) -> bool;
}

/// Production filesystem provider using real filesystem metadata.
pub struct SystemFs;

impl FsProvider for SystemFs {
    fn is_executable(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            match std::fs::metadata(path) {
                Ok(metadata) => metadata.permissions().mode() & 0o111 != 0,
                Err(_) => false,
            }
        }

        // Windows: being a file under a PATHEXT variant is enough
        #[cfg(not(unix))]
        {
            true
        }
    }
}

/// Build the PATH for a child process: extra directories first, then the
/// current PATH. With no extra directories the current PATH is used as-is.
#[must_use]
pub fn extended_path(extra_paths: &[String]) -> OsString {
    extended_path_with(&SystemEnv, extra_paths)
}

fn extended_path_with(env: &dyn EnvProvider, extra_paths: &[String]) -> OsString {
    let current = env
        .get("PATH")
        .and_then(|p| p.into_string().ok())
        .unwrap_or_default();

    if extra_paths.is_empty() {
        return OsString::from(current);
    }

    OsString::from(format!(
        "{}{}{}",
        extra_paths.join(PATH_SEPARATOR),
        PATH_SEPARATOR,
        current
    ))
}

/// Whether `command` resolves to an executable through the extended PATH.
///
/// Returns false on any resolution failure.
#[must_use]
pub fn command_exists(command: &str, extra_paths: &[String]) -> bool {
    find_executable_with(command, extra_paths, &SystemEnv, &SystemFs).is_some()
}

/// Resolve a command to an executable path, with injected dependencies.
///
/// An absolute command is checked directly; a bare name is searched through
/// the extended PATH in order.
pub fn find_executable_with(
    command: &str,
    extra_paths: &[String],
    env: &dyn EnvProvider,
    fs: &dyn FsProvider,
) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }

    let command_path = Path::new(command);
    if command_path.is_absolute() {
        return fs
            .is_executable(command_path)
            .then(|| command_path.to_path_buf());
    }

    let search_path = extended_path_with(env, extra_paths);
    let search_path = search_path.to_str()?;

    for dir in search_path.split(PATH_SEPARATOR) {
        if dir.is_empty() {
            continue;
        }
        for name in name_variants(command, env) {
            let candidate = Path::new(dir).join(&name);
            if fs.is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }

    None
}

/// PATHEXT variants on windows (npx → npx, npx.cmd, npx.exe, ...).
#[cfg(windows)]
fn name_variants(command: &str, env: &dyn EnvProvider) -> Vec<String> {
    let mut variants = vec![command.to_string()];
    match env.get("PATHEXT").and_then(|v| v.into_string().ok()) {
        Some(pathext) => {
            for ext in pathext.split(';').filter(|e| !e.is_empty()) {
                variants.push(format!("{command}{ext}"));
            }
        }
        None => {
            for ext in [".cmd", ".exe", ".bat", ".com"] {
                variants.push(format!("{command}{ext}"));
            }
        }
    }
    variants
}

#[cfg(not(windows))]
fn name_variants(command: &str, _env: &dyn EnvProvider) -> Vec<String> {
    vec![command.to_string()]
}
