//! Script backend.
//!
//! Renders an operation list as a shell script instead of touching the
//! filesystem. Each dialect only decides how to quote and spell commands; the
//! per-operation skeleton (progress lines, directory creation, guarded
//! transfer) is shared.

use crate::models::plan::{OperationKind, PathMapping, PlannedOperation};
use crate::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const GENERATOR: &str = "plex-renamer";

/// Target shell grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShellDialect {
    /// Windows `cmd.exe` batch file.
    #[default]
    Batch,
    PowerShell,
    /// POSIX `sh`.
    Posix,
}

impl ShellDialect {
    /// Conventional script file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            ShellDialect::Batch => "bat",
            ShellDialect::PowerShell => "ps1",
            ShellDialect::Posix => "sh",
        }
    }

    fn strategy(&self) -> &'static dyn ScriptDialect {
        match self {
            ShellDialect::Batch => &Batch,
            ShellDialect::PowerShell => &PowerShell,
            ShellDialect::Posix => &Posix,
        }
    }
}

impl fmt::Display for ShellDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellDialect::Batch => write!(f, "cmd"),
            ShellDialect::PowerShell => write!(f, "powershell"),
            ShellDialect::Posix => write!(f, "bash"),
        }
    }
}

impl FromStr for ShellDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cmd" | "bat" | "batch" => Ok(ShellDialect::Batch),
            "powershell" | "ps" | "ps1" | "pwsh" => Ok(ShellDialect::PowerShell),
            "bash" | "sh" | "posix" => Ok(ShellDialect::Posix),
            other => Err(Error::UnsupportedShell(other.to_string())),
        }
    }
}

/// Per-dialect spelling of the script skeleton.
trait ScriptDialect {
    fn line_ending(&self) -> &'static str {
        "\n"
    }

    fn header(&self) -> Vec<String>;

    /// Print `text` literally.
    fn echo(&self, text: &str) -> String;

    /// Create `dir` and its parents unless it exists.
    fn ensure_dir(&self, dir: &str) -> String;

    /// Copy or move `src` to `dst` unless `dst` exists.
    fn transfer(&self, kind: OperationKind, src: &str, dst: &str) -> String;

    fn footer(&self) -> Vec<String>;

    /// Whether `path` can be written as a single literal argument.
    fn can_quote(&self, _path: &str) -> bool {
        true
    }

    /// A line the shell ignores.
    fn comment(&self, text: &str) -> String {
        format!("# {}", text)
    }
}

struct Batch;
struct PowerShell;
struct Posix;

impl ScriptDialect for Batch {
    fn line_ending(&self) -> &'static str {
        "\r\n"
    }

    fn header(&self) -> Vec<String> {
        vec![
            "@echo off".to_string(),
            "chcp 65001 >nul".to_string(),
            format!("REM Generated by {}", GENERATOR),
        ]
    }

    fn echo(&self, text: &str) -> String {
        format!("echo {}", escape_batch(text))
    }

    fn ensure_dir(&self, dir: &str) -> String {
        let dir = quote_batch(dir);
        format!("if not exist {} mkdir {}", dir, dir)
    }

    fn transfer(&self, kind: OperationKind, src: &str, dst: &str) -> String {
        let verb = match kind {
            OperationKind::Copy => "copy",
            OperationKind::Move => "move",
        };
        let dst = quote_batch(dst);
        format!("if not exist {} {} {} {} >nul", dst, verb, quote_batch(src), dst)
    }

    fn footer(&self) -> Vec<String> {
        vec!["echo Done!".to_string(), "pause".to_string()]
    }

    /// cmd.exe has no escape for `"` inside a quoted argument, and a line
    /// break always ends the command.
    fn can_quote(&self, path: &str) -> bool {
        !path.contains(['"', '\r', '\n'])
    }

    fn comment(&self, text: &str) -> String {
        format!("REM {}", text)
    }
}

impl ScriptDialect for PowerShell {
    fn header(&self) -> Vec<String> {
        vec![format!("# Generated by {}", GENERATOR)]
    }

    fn echo(&self, text: &str) -> String {
        format!("Write-Host {}", quote_powershell(text))
    }

    fn ensure_dir(&self, dir: &str) -> String {
        let dir = quote_powershell(dir);
        format!(
            "if (-not (Test-Path -LiteralPath {})) {{ New-Item -ItemType Directory -Path {} -Force | Out-Null }}",
            dir, dir
        )
    }

    fn transfer(&self, kind: OperationKind, src: &str, dst: &str) -> String {
        let cmdlet = match kind {
            OperationKind::Copy => "Copy-Item",
            OperationKind::Move => "Move-Item",
        };
        let dst = quote_powershell(dst);
        format!(
            "if (-not (Test-Path -LiteralPath {})) {{ {} -LiteralPath {} -Destination {} }}",
            dst,
            cmdlet,
            quote_powershell(src),
            dst
        )
    }

    fn footer(&self) -> Vec<String> {
        vec!["Write-Host 'Done!'".to_string()]
    }
}

impl ScriptDialect for Posix {
    fn header(&self) -> Vec<String> {
        vec!["#!/bin/sh".to_string(), format!("# Generated by {}", GENERATOR)]
    }

    fn echo(&self, text: &str) -> String {
        format!("printf '%s\\n' {}", quote_posix(text))
    }

    fn ensure_dir(&self, dir: &str) -> String {
        format!("mkdir -p -- {}", quote_posix(dir))
    }

    fn transfer(&self, kind: OperationKind, src: &str, dst: &str) -> String {
        let cmd = match kind {
            OperationKind::Copy => "cp",
            OperationKind::Move => "mv",
        };
        let dst = quote_posix(dst);
        format!(
            "if [ ! -e {} ] && [ ! -L {} ]; then {} -- {} {}; fi",
            dst,
            dst,
            cmd,
            quote_posix(src),
            dst
        )
    }

    fn footer(&self) -> Vec<String> {
        vec!["echo 'Done!'".to_string()]
    }
}

/// Escape text for an unquoted `cmd.exe` command line.
///
/// `%` and `^` are doubled first, then `& < > | !` get a caret prefix, so no
/// introduced caret is ever doubled.
pub fn escape_batch(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' => out.push_str("%%"),
            '^' => out.push_str("^^"),
            _ => out.push(c),
        }
    }

    let mut escaped = String::with_capacity(out.len());
    for c in out.chars() {
        if matches!(c, '&' | '<' | '>' | '|' | '!') {
            escaped.push('^');
        }
        escaped.push(c);
    }
    escaped
}

/// Double-quote a path for `cmd.exe`.
///
/// Inside quotes carets and operators are literal; only `%` expansion still
/// happens in a batch file.
pub fn quote_batch(path: &str) -> String {
    format!("\"{}\"", path.replace('%', "%%"))
}

/// Escape text for a PowerShell single-quoted literal.
///
/// PowerShell also treats the typographic single quotes as quote characters.
pub fn escape_powershell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        out.push(c);
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            out.push(c);
        }
    }
    out
}

pub fn quote_powershell(text: &str) -> String {
    format!("'{}'", escape_powershell(text))
}

/// Escape text for a POSIX single-quoted literal.
pub fn escape_posix(text: &str) -> String {
    text.replace('\'', "'\\''")
}

pub fn quote_posix(text: &str) -> String {
    format!("'{}'", escape_posix(text))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Render `operations` as a script in `dialect`.
///
/// Every operation prints `[i/total] <mode>` with its from/to paths, ensures
/// the destination directory exists, then transfers only if the destination
/// is absent. An operation whose paths the dialect cannot quote is replaced
/// by a comment line and never transferred.
pub fn emit(operations: &[PlannedOperation], dialect: ShellDialect, mode: OperationKind) -> String {
    let d = dialect.strategy();
    let total = operations.len();
    let mut lines = d.header();
    lines.push(String::new());

    for (i, op) in operations.iter().enumerate() {
        let src = path_str(&op.source);
        let dst = path_str(&op.destination);

        if !d.can_quote(&src) || !d.can_quote(&dst) {
            tracing::warn!(
                "Skipping operation {} in {} script: path cannot be quoted safely: {:?}",
                i + 1,
                dialect,
                op.source
            );
            lines.push(d.comment(&format!(
                "[{}/{}] skipped: path cannot be quoted safely for {}",
                i + 1,
                total,
                dialect
            )));
            continue;
        }

        lines.push(d.echo(&format!("[{}/{}] {}", i + 1, total, mode)));
        lines.push(d.echo(&format!("  From: {}", src)));
        lines.push(d.echo(&format!("  To:   {}", dst)));
        if let Some(parent) = op.destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            lines.push(d.ensure_dir(&path_str(parent)));
        }
        lines.push(d.transfer(mode, &src, &dst));
    }

    lines.push(String::new());
    lines.extend(d.footer());

    let eol = d.line_ending();
    let mut script = lines.join(eol);
    script.push_str(eol);

    tracing::debug!("Emitted {} script with {} operations", dialect, total);
    script
}

/// Run metadata shown in a preview.
#[derive(Debug, Clone)]
pub struct PreviewInfo {
    pub mode: OperationKind,
    pub output_dir: Option<PathBuf>,
    pub path_map: Option<PathMapping>,
}

/// Render a dialect-independent, non-executable dry-run listing.
pub fn preview(operations: &[PlannedOperation], info: &PreviewInfo) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("  {} - DRY RUN PREVIEW\n", GENERATOR));
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("Mode:        {}\n", info.mode));
    match &info.output_dir {
        Some(dir) => out.push_str(&format!("Output dir:  {}\n", dir.display())),
        None => out.push_str("Output dir:  (library locations)\n"),
    }
    if let Some(map) = &info.path_map {
        out.push_str(&format!("Path map:    {}\n", map));
    }
    out.push_str(&format!("Operations:  {}\n", operations.len()));
    out.push('\n');
    out.push_str("WARNING: preview only. This is NOT an executable script.\n");
    out.push('\n');

    for (i, op) in operations.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n", i + 1, info.mode));
        out.push_str(&format!("    From: {}\n", op.source.display()));
        out.push_str(&format!("    To:   {}\n", op.destination.display()));
    }

    out
}
