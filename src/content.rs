//! Pure helpers applied to fetched record content.

use serde::Serialize;
use std::fmt;

/// Returns the lines of `content` from zero-based `start_line` onward.
///
/// Lines are separated by `\n`. A start past the last line yields `""`.
#[must_use]
pub fn slice_lines(content: &str, start_line: usize) -> &str {
    if start_line == 0 {
        return content;
    }
    match content.match_indices('\n').nth(start_line - 1) {
        Some((idx, _)) => &content[idx + 1..],
        None => "",
    }
}

/// How a caller should run fetched content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionHint {
    OpenHtml,
    RunShell,
    RunPython,
    RunNode,
    CreateAndExecute,
}

impl ExecutionHint {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::OpenHtml => "Open as HTML in a browser",
            Self::RunShell => "Run with shell (sh/bash)",
            Self::RunPython => "Run with python interpreter (python3)",
            Self::RunNode => "Run with node",
            Self::CreateAndExecute => "Create a file with this content and execute it",
        }
    }
}

impl fmt::Display for ExecutionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A rule matches when the content contains every `all_of` marker and, if
/// `any_of` is non-empty, at least one of those.
struct HintRule {
    hint: ExecutionHint,
    all_of: &'static [&'static str],
    any_of: &'static [&'static str],
}

impl HintRule {
    fn matches(&self, lowered: &str) -> bool {
        self.all_of.iter().all(|m| lowered.contains(m))
            && (self.any_of.is_empty() || self.any_of.iter().any(|m| lowered.contains(m)))
    }
}

// Evaluated in order; first match wins.
const HINT_RULES: &[HintRule] = &[
    HintRule {
        hint: ExecutionHint::OpenHtml,
        all_of: &["<script"],
        any_of: &["<html", "<!doctype html"],
    },
    HintRule {
        hint: ExecutionHint::RunShell,
        all_of: &[],
        any_of: &["#!/bin/sh", "#!/bin/bash", "#!/usr/bin/env bash", "shell"],
    },
    HintRule {
        hint: ExecutionHint::RunPython,
        all_of: &[],
        any_of: &["python", "#!/usr/bin/python"],
    },
    HintRule {
        hint: ExecutionHint::RunNode,
        all_of: &[],
        any_of: &["node", "javascript", "npm"],
    },
];

/// Picks an execution hint by case-insensitive marker sniffing.
#[must_use]
pub fn suggest_execution(content: &str) -> ExecutionHint {
    let lowered = content.to_lowercase();
    HINT_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or(ExecutionHint::CreateAndExecute, |rule| rule.hint)
}
