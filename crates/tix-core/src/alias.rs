//! Command-alias expansion.
//!
//! Aliases rewrite a raw input line before dispatch using positional
//! templates: `$1`..`$N` consume arguments by position, `$0` collects
//! whatever is left over. Expansion is a single deterministic pass. The
//! result is never re-scanned for further alias triggers, and placeholder
//! lookalikes inside substituted arguments are left alone.

use std::collections::{BTreeMap, BTreeSet};

/// One-pass alias expander with a reserved-name guard.
#[derive(Debug, Clone, Default)]
pub struct AliasExpander {
    rules: BTreeMap<String, String>,
    reserved: BTreeSet<String>,
}

impl AliasExpander {
    /// Build from an alias table and the set of built-in command names that
    /// may never be shadowed.
    pub fn new(
        rules: impl IntoIterator<Item = (String, String)>,
        reserved: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            rules: rules.into_iter().collect(),
            reserved: reserved.into_iter().collect(),
        }
    }

    /// The registered rules, for `alias` listings.
    #[must_use]
    pub const fn rules(&self) -> &BTreeMap<String, String> {
        &self.rules
    }

    /// Alias names that collide with the reserved set.
    #[must_use]
    pub fn shadowed(&self) -> Vec<String> {
        self.rules
            .keys()
            .filter(|name| self.reserved.contains(*name))
            .cloned()
            .collect()
    }

    /// Rewrite `line` if its head token names an alias.
    ///
    /// Reserved command names always pass through unchanged, as does any
    /// line whose head token matches no rule.
    #[must_use]
    pub fn expand(&self, line: &str) -> String {
        let trimmed = line.trim();
        let Some(head) = trimmed.split_whitespace().next() else {
            return line.to_string();
        };
        if self.reserved.contains(head) {
            return line.to_string();
        }
        let Some(template) = self.rules.get(head) else {
            return line.to_string();
        };

        let rest = trimmed[head.len()..].trim_start();
        let args = split_args(rest);
        substitute(template, &args)
    }
}

/// Quote-aware argument splitting, falling back to whitespace splitting when
/// the line has unbalanced quoting.
#[must_use]
pub fn split_args(input: &str) -> Vec<String> {
    shell_words::split(input)
        .unwrap_or_else(|_| input.split_whitespace().map(str::to_string).collect())
}

/// Substitute `$1`..`$N` and `$0` in `template` against `args`, one pass.
fn substitute(template: &str, args: &[String]) -> String {
    let highest = highest_placeholder(template);

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        let mut index: Option<usize> = None;
        while let Some(&digit) = chars.peek() {
            let Some(d) = digit.to_digit(10) else { break };
            index = Some(index.unwrap_or(0) * 10 + d as usize);
            chars.next();
        }
        match index {
            // A bare `$` is literal text.
            None => out.push('$'),
            // `$0`: everything past the highest positional, space-joined.
            Some(0) => {
                let remainder = args.get(highest..).unwrap_or_default();
                out.push_str(&remainder.join(" "));
            }
            Some(n) => {
                if let Some(arg) = args.get(n - 1) {
                    out.push_str(arg);
                }
            }
        }
    }
    out
}

/// The highest `$N` (N >= 1) used by the template; 0 if none.
fn highest_placeholder(template: &str) -> usize {
    let mut highest = 0;
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            continue;
        }
        let mut index = 0usize;
        let mut saw_digit = false;
        while let Some(&digit) = chars.peek() {
            let Some(d) = digit.to_digit(10) else { break };
            index = index * 10 + d as usize;
            saw_digit = true;
            chars.next();
        }
        if saw_digit && index > highest {
            highest = index;
        }
    }
    highest
}
