//! Constants and fixed name sets for esrever

/// First line of the managed region in the startup file.
pub const START_MARKER: &str = "# >>> esrever wrappers >>>";

/// Last line of the managed region in the startup file.
pub const END_MARKER: &str = "# <<< esrever wrappers <<<";

/// Prefix of the header comment that records when the block was written.
pub const INSTALLED_AT_PREFIX: &str = "# Installed: ";

/// Literal that `--confirm` must match before blocklisted names may be wrapped.
pub const CONFIRMATION_TOKEN: &str = "I-UNDERSTAND-THE-RISK";

/// Letter prepended to identifiers that would otherwise start with a digit.
pub const DIGIT_PREFIX: char = 'r';

/// Identifier used when sanitizing leaves nothing behind.
pub const FALLBACK_IDENTIFIER: &str = "esrever_cmd";

/// Shell builtins appended to every scan after the search-path directories.
pub const SCANNED_BUILTINS: [&str; 6] = ["cd", "exit", "pushd", "popd", "dirs", "help"];

/// Builtins whose wrappers must call `builtin` rather than `command`.
///
/// Both change the state of the calling shell, so the wrapper body has to run
/// them in the current process.
pub const BUILTIN_DELEGATED: [&str; 2] = ["cd", "exit"];

/// Commands never wrapped unless the user forces it with the confirmation token.
pub const SENSITIVE_COMMANDS: &[&str] = &[
    // privilege
    "sudo", "su", "doas", "pkexec", "passwd", "visudo",
    // destructive filesystem operations
    "rm", "rmdir", "mv", "dd", "shred", "wipefs", "mkfs", "fdisk", "sfdisk", "parted",
    "chmod", "chown", "chgrp", "truncate",
    // process and system control
    "kill", "killall", "pkill", "reboot", "shutdown", "halt", "poweroff", "init", "systemctl",
    "crontab",
    // mounts, accounts and network configuration
    "mount", "umount", "useradd", "userdel", "usermod", "iptables", "nft", "ip", "ifconfig",
    "route",
];

/// Builtins of bash and zsh that the search-path resolver treats as existing.
pub const KNOWN_SHELL_BUILTINS: &[&str] = &[
    ".", ":", "alias", "bg", "bind", "break", "builtin", "caller", "cd", "command", "compgen",
    "complete", "continue", "declare", "dirs", "disown", "echo", "enable", "eval", "exec", "exit",
    "export", "false", "fc", "fg", "getopts", "hash", "help", "history", "jobs", "kill", "let",
    "local", "logout", "mapfile", "popd", "printf", "pushd", "pwd", "read", "readarray",
    "readonly", "return", "set", "shift", "shopt", "source", "suspend", "test", "times", "trap",
    "true", "type", "typeset", "ulimit", "umask", "unalias", "unset", "wait", "whence", "where",
    "which", "setopt", "unsetopt", "autoload", "bindkey", "zle", "zmodload", "rehash",
];

/// Reserved words that can never be used as a function name.
pub const SHELL_RESERVED_WORDS: &[&str] = &[
    "if", "then", "else", "elif", "fi", "case", "esac", "for", "select", "while", "until", "do",
    "done", "in", "function", "time", "coproc", "repeat", "foreach", "end",
];

/// Exit code for a usage error (unknown action or option).
pub const EXIT_USAGE: u8 = 2;
/// Exit code when `--force-sensitive` is given without the confirmation token.
pub const EXIT_CONFIRMATION: u8 = 3;
/// Exit code when scanning found no candidate names at all.
pub const EXIT_NO_CANDIDATES: u8 = 4;
/// Exit code for every other fatal error.
pub const EXIT_FAILURE: u8 = 1;
