//! Live resolvers answering "does this name already exist?"

use crate::scanner::is_executable_file;
use esrever_format::constants::{KNOWN_SHELL_BUILTINS, SHELL_RESERVED_WORDS};
use esrever_format::Resolver;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// Looks names up on a search path and in the known builtin/keyword sets.
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    dirs: Vec<PathBuf>,
}

impl SearchPathResolver {
    /// Resolver over `dirs`
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl Resolver for SearchPathResolver {
    fn resolves(&self, name: &str) -> bool {
        if name.is_empty() || name.contains('/') {
            return false;
        }
        if KNOWN_SHELL_BUILTINS.contains(&name) || SHELL_RESERVED_WORDS.contains(&name) {
            return true;
        }
        self.dirs.iter().any(|dir| is_executable_file(&dir.join(name)))
    }
}

/// Asks a real shell whether `command -v NAME` succeeds.
///
/// The shell runs non-interactively, so it sees its builtins and `PATH` but
/// not functions or aliases defined in startup files. Spawn failures count as
/// "does not resolve".
#[derive(Debug, Clone)]
pub struct ShellResolver {
    shell: PathBuf,
    search_path: Option<String>,
}

impl ShellResolver {
    /// Resolver probing with `shell`
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
            search_path: None,
        }
    }

    /// Resolver probing with `$SHELL`, falling back to `/bin/sh`.
    pub fn from_env() -> Self {
        let shell = std::env::var_os("SHELL")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/bin/sh"));
        Self::new(shell)
    }

    /// Run the probe with `PATH` set to `search_path`.
    pub fn with_search_path(mut self, search_path: impl Into<String>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Shell used for probing
    pub fn shell(&self) -> &Path {
        &self.shell
    }
}

impl Resolver for ShellResolver {
    fn resolves(&self, name: &str) -> bool {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg("command -v -- \"$1\"")
            .arg("esrever-probe")
            .arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }
        match cmd.status() {
            Ok(status) => {
                trace!(name, found = status.success(), "shell probe");
                status.success()
            }
            Err(err) => {
                debug!(shell = %self.shell.display(), error = %err, "shell probe failed");
                false
            }
        }
    }
}

/// Resolves when any inner resolver does.
#[derive(Default)]
pub struct AnyResolver {
    inner: Vec<Box<dyn Resolver>>,
}

impl AnyResolver {
    /// Empty composite (resolves nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resolver
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.inner.push(Box::new(resolver));
        self
    }
}

impl Resolver for AnyResolver {
    fn resolves(&self, name: &str) -> bool {
        self.inner.iter().any(|resolver| resolver.resolves(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esrever_test_utils::{ExecDirBuilder, FakeResolver};

    #[test]
    fn search_path_finds_executables_only() {
        let dir = ExecDirBuilder::new()
            .unwrap()
            .executable("sl")
            .unwrap()
            .plain_file("notes")
            .unwrap()
            .build();
        let resolver = SearchPathResolver::new(vec![dir.path().to_path_buf()]);

        assert!(resolver.resolves("sl"));
        assert!(!resolver.resolves("notes"));
        assert!(!resolver.resolves("tac"));
    }

    #[test]
    fn builtins_and_keywords_resolve() {
        let resolver = SearchPathResolver::new(Vec::new());
        assert!(resolver.resolves("cd"));
        assert!(resolver.resolves("echo"));
        assert!(resolver.resolves("fi"));
        assert!(resolver.resolves("esac"));
        assert!(!resolver.resolves("tixe"));
    }

    #[test]
    fn paths_and_empty_names_never_resolve() {
        let resolver = SearchPathResolver::new(vec![PathBuf::from("/bin")]);
        assert!(!resolver.resolves(""));
        assert!(!resolver.resolves("../bin/sh"));
    }

    #[test]
    fn missing_shell_resolves_nothing() {
        let resolver = ShellResolver::new("/no/such/shell");
        assert!(!resolver.resolves("ls"));
    }

    #[cfg(unix)]
    #[test]
    fn shell_probe_uses_given_search_path() {
        let dir = ExecDirBuilder::new().unwrap().executable("sl").unwrap().build();
        let resolver =
            ShellResolver::new("/bin/sh").with_search_path(dir.path().display().to_string());

        assert!(resolver.resolves("sl"));
        assert!(!resolver.resolves("surely-not-a-command-xyz"));
    }

    #[test]
    fn any_resolver_combines() {
        let resolver = AnyResolver::new()
            .with(FakeResolver::with(["a"]))
            .with(FakeResolver::with(["b"]));
        assert!(resolver.resolves("a"));
        assert!(resolver.resolves("b"));
        assert!(!resolver.resolves("c"));
        assert!(!AnyResolver::new().resolves("a"));
    }
}
