// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// GitHub token resolution for the search collaborator.
///
/// Resolution order: `GITHUB_TOKEN`, then `GH_TOKEN`, then the `gh auth
/// token` CLI. The documented config placeholder counts as unset so a
/// copied template never reaches the API.
use std::process::Command;

/// Placeholder value shipped in configuration templates.
const TOKEN_PLACEHOLDER: &str = "__SET_GITHUB_TOKEN__";

/// Resolves a usable GitHub token, or `None` when nothing is configured.
pub fn resolve_token() -> Option<String> {
    for variable in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Some(token) = usable_token(std::env::var(variable).ok()) {
            return Some(token);
        }
    }
    usable_token(gh_cli_token())
}

/// Filters out empty values and the template placeholder.
fn usable_token(value: Option<String>) -> Option<String> {
    value
        .map(|token| token.trim().to_owned())
        .filter(|token| !token.is_empty() && token != TOKEN_PLACEHOLDER)
}

/// Asks the `gh` CLI for its stored token.
///
/// Any failure, including the CLI being absent, resolves to `None`.
fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}
