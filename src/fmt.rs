//! Human-friendly CLI output formatters.
//!
//! Each `fmt_*` function formats one command's output for terminal display.
//! When `color` is true, ANSI escape codes are emitted via `owo_colors`.

use crate::identifier::ParsedIdentifier;
use crate::tools::{ResolveOutput, ResponseKind};
use crate::types::Namehash;
use owo_colors::OwoColorize;
use std::io::{self, Write};

// ── resolve ─────────────────────────────────────────────────────────────────

pub fn fmt_resolve(w: &mut impl Write, out: &ResolveOutput, color: bool) -> io::Result<()> {
    let label = match out.kind {
        ResponseKind::Context => "context",
        ResponseKind::Execution => "execution",
    };

    if color {
        writeln!(w, "{}  ({})", out.ens_name.bold(), label.dimmed())?;
        writeln!(w, "  {} {}", "id:".dimmed(), out.id)?;
        writeln!(w, "  {} {}", "from line:".dimmed(), out.start_line)?;
    } else {
        writeln!(w, "{}  ({})", out.ens_name, label)?;
        writeln!(w, "  id: {}", out.id)?;
        writeln!(w, "  from line: {}", out.start_line)?;
    }

    writeln!(w)?;
    for (i, line) in out.content.lines().enumerate() {
        let n = out.start_line + i;
        if color {
            writeln!(w, "{}{}", format_args!("{n:>5}│ ").green(), line)?;
        } else {
            writeln!(w, "{n:>5}│ {line}")?;
        }
    }

    if let Some(hint) = out.execution_hint {
        writeln!(w)?;
        if color {
            writeln!(w, "{} {}", "suggested:".yellow(), hint)?;
        } else {
            writeln!(w, "suggested: {hint}")?;
        }
    }

    Ok(())
}

// ── name ────────────────────────────────────────────────────────────────────

pub fn fmt_name(
    w: &mut impl Write,
    parsed: &ParsedIdentifier,
    node: &Namehash,
    color: bool,
) -> io::Result<()> {
    let name = parsed.external_name();
    if color {
        writeln!(w, "{}", name.bold())?;
        writeln!(w, "  {} {}", "namehash:".dimmed(), node)?;
        writeln!(w, "  {} {}", "segments:".dimmed(), parsed.segments.join(" › "))?;
        if let Some(ns) = &parsed.namespace_update {
            writeln!(w, "  {} {}", "sets namespace:".dimmed(), ns.cyan())?;
        }
    } else {
        writeln!(w, "{name}")?;
        writeln!(w, "  namehash: {node}")?;
        writeln!(w, "  segments: {}", parsed.segments.join(" › "))?;
        if let Some(ns) = &parsed.namespace_update {
            writeln!(w, "  sets namespace: {ns}")?;
        }
    }
    Ok(())
}
