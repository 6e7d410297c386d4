//! esrever Test Utilities
//!
//! Shared fixtures for the esrever crates: a fake resolver, a builder for
//! directories full of executables, and helpers for startup-file text.

use esrever_format::constants::INSTALLED_AT_PREFIX;
use esrever_format::Resolver;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Resolver answering from a fixed set of names.
#[derive(Debug, Clone, Default)]
pub struct FakeResolver {
    names: HashSet<String>,
}

impl FakeResolver {
    /// Resolver where nothing exists
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolver where exactly `names` exist
    pub fn with<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one more existing name
    pub fn insert(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }
}

impl Resolver for FakeResolver {
    fn resolves(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Builder for a temporary directory of executables and plain files.
pub struct ExecDirBuilder {
    dir: TempDir,
}

impl ExecDirBuilder {
    /// Create a new empty directory
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Add an executable script
    pub fn executable(self, name: &str) -> io::Result<Self> {
        let path = self.dir.path().join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n")?;
        set_mode(&path, 0o755)?;
        Ok(self)
    }

    /// Add several executable scripts
    pub fn executables(mut self, names: &[&str]) -> io::Result<Self> {
        for name in names {
            self = self.executable(name)?;
        }
        Ok(self)
    }

    /// Add a regular file without execute permission
    pub fn plain_file(self, name: &str) -> io::Result<Self> {
        let path = self.dir.path().join(name);
        fs::write(&path, "data\n")?;
        set_mode(&path, 0o644)?;
        Ok(self)
    }

    /// Add a subdirectory (which must never be scanned into)
    pub fn subdir(self, name: &str) -> io::Result<Self> {
        fs::create_dir_all(self.dir.path().join(name))?;
        Ok(self)
    }

    /// Finish building
    pub fn build(self) -> TempDir {
        self.dir
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Join directories into a colon-separated search path.
pub fn search_path(dirs: &[&Path]) -> String {
    dirs.iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(":")
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_rc_file(dir: &Path, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Replace install timestamps so two renders can be compared.
pub fn strip_timestamp(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.starts_with(INSTALLED_AT_PREFIX) {
                let ending = if line.ends_with('\n') { "\n" } else { "" };
                format!("{INSTALLED_AT_PREFIX}<timestamp>{ending}")
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// A typical bash startup file without any managed block.
pub fn sample_bashrc() -> &'static str {
    "# ~/.bashrc\n\
     [ -z \"$PS1\" ] && return\n\
     \n\
     export EDITOR=vim\n\
     alias ll='ls -alF'\n"
}
