//! Rendering wrapper plans into the managed shell block

use esrever_format::constants::{END_MARKER, INSTALLED_AT_PREFIX, START_MARKER};
use esrever_format::{Delegation, WrapperSpec};
use std::fmt::Write;

const DEFINITION_PREFIX: &str = "if ! command -v ";

/// Render the complete marker-delimited block.
///
/// The body only activates in interactive shells, and each definition is
/// skipped when its identifier already resolves at source time. Every line,
/// including the end marker, ends with `\n`.
pub fn render_block(wrappers: &[WrapperSpec], installed_at: &str) -> String {
    let mut out = String::with_capacity(256 + wrappers.len() * 96);
    out.push_str(START_MARKER);
    out.push('\n');
    out.push_str(INSTALLED_AT_PREFIX);
    out.push_str(installed_at);
    out.push('\n');
    out.push_str("# Managed by esrever. Run `esrever uninstall` to remove; edits here are lost on reinstall.\n");
    out.push_str("case $- in\n");
    out.push_str("  *i*)\n");
    for spec in wrappers {
        out.push_str("    ");
        out.push_str(&render_definition(spec));
        out.push('\n');
    }
    out.push_str("    ;;\n");
    out.push_str("esac\n");
    out.push_str(END_MARKER);
    out.push('\n');
    out
}

/// Render one guarded function definition.
pub fn render_definition(spec: &WrapperSpec) -> String {
    let keyword = match spec.delegation {
        Delegation::Command => "command",
        Delegation::Builtin => "builtin",
    };
    let mut line = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        line,
        "{prefix}{ident} >/dev/null 2>&1; then {ident}() {{ {keyword} {original} \"$@\"; }}; fi",
        prefix = DEFINITION_PREFIX,
        ident = spec.identifier,
        original = shell_quote(&spec.original),
    );
    line
}

/// Number of wrapper definitions inside a rendered block.
pub fn count_definitions(block: &str) -> usize {
    block
        .lines()
        .filter(|line| line.trim_start().starts_with(DEFINITION_PREFIX))
        .count()
}

/// Timestamp recorded in a rendered block's header, if present.
pub fn installed_at(block: &str) -> Option<&str> {
    block
        .lines()
        .find_map(|line| line.strip_prefix(INSTALLED_AT_PREFIX))
        .map(str::trim_end)
}

/// Single-quote `word` for POSIX shells unless it is made of safe characters.
fn shell_quote(word: &str) -> String {
    if !word.is_empty()
        && word.bytes().all(|b| {
            matches!(b,
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' |
                b'_' | b'-' | b'.' | b'/' | b':' | b'@' | b'%' | b'+' | b',')
        })
    {
        return word.to_string();
    }
    let mut out = String::with_capacity(word.len() + 2);
    out.push('\'');
    for ch in word.chars() {
        if ch == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}
