//! Socket directory discovery.
//!
//! The presence host listens on a numbered socket (`discord-ipc-0` ..
//! `discord-ipc-9`) inside a per-user runtime directory. Which directory
//! depends on how the host was packaged:
//!
//! 1. snap: `/run/user/<uid>/snap.discord`
//! 2. flatpak: `/run/user/<uid>/.flatpak/com.discordapp.Discord/xdg-run`
//! 3. first set of `XDG_RUNTIME_DIR`, `TMPDIR`, `TMP`, `TEMP`
//! 4. `/tmp`
//!
//! Sandboxed directories only count if they exist on disk. Locating never
//! fails; a wrong guess surfaces as a connect error.
//!
//! On Windows the host uses named pipes, which all live in `\\?\pipe\`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Runtime-directory variables, in priority order.
pub const RUNTIME_DIR_VARS: [&str; 4] = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"];

/// Last-resort directory when nothing else applies.
#[cfg(not(windows))]
pub const FALLBACK_DIR: &str = "/tmp";

/// Named-pipe namespace.
#[cfg(windows)]
pub const FALLBACK_DIR: &str = r"\\?\pipe\";

/// Resolves the directory holding the peer's sockets.
#[derive(Debug, Clone)]
pub struct SocketLocator {
    sandbox_dirs: Vec<PathBuf>,
    env_vars: Vec<String>,
    fallback: PathBuf,
}

impl SocketLocator {
    /// Locator with the platform's default resolution order.
    pub fn new() -> Self {
        Self {
            sandbox_dirs: default_sandbox_dirs(),
            env_vars: default_env_vars(),
            fallback: PathBuf::from(FALLBACK_DIR),
        }
    }

    /// Locator that always yields `dir`.
    pub fn fixed(dir: impl Into<PathBuf>) -> Self {
        Self {
            sandbox_dirs: Vec::new(),
            env_vars: Vec::new(),
            fallback: dir.into(),
        }
    }

    /// Locator with explicit candidates, mostly for tests.
    pub fn with_candidates(
        sandbox_dirs: Vec<PathBuf>,
        env_vars: Vec<String>,
        fallback: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sandbox_dirs,
            env_vars,
            fallback: fallback.into(),
        }
    }

    /// Resolve the socket directory from the process environment.
    pub fn locate(&self) -> PathBuf {
        self.locate_with(|name| std::env::var_os(name), |path| path.exists())
    }

    /// Resolve the socket directory with injected environment and filesystem probes.
    ///
    /// Empty variable values are treated as unset.
    pub fn locate_with<E, X>(&self, env: E, exists: X) -> PathBuf
    where
        E: Fn(&str) -> Option<OsString>,
        X: Fn(&Path) -> bool,
    {
        if let Some(dir) = self.sandbox_dirs.iter().find(|dir| exists(dir)) {
            return dir.clone();
        }

        self.env_vars
            .iter()
            .filter_map(|name| env(name))
            .find(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for SocketLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn default_sandbox_dirs() -> Vec<PathBuf> {
    // SAFETY: getuid has no preconditions and cannot fail.
    let uid = unsafe { libc::getuid() };
    let run_dir = PathBuf::from(format!("/run/user/{uid}"));
    vec![
        run_dir.join("snap.discord"),
        run_dir.join(".flatpak/com.discordapp.Discord/xdg-run"),
    ]
}

#[cfg(not(unix))]
fn default_sandbox_dirs() -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(not(windows))]
fn default_env_vars() -> Vec<String> {
    RUNTIME_DIR_VARS.iter().map(|name| name.to_string()).collect()
}

#[cfg(windows)]
fn default_env_vars() -> Vec<String> {
    Vec::new()
}
