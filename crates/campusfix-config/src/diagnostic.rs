// SPDX-FileCopyrightText: 2026 CampusFix Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment error to miette diagnostic conversion.
//!
//! Figment reports extraction failures as a flat error list; this module
//! turns each one into a miette diagnostic the binary can render. Unknown
//! keys additionally get a span into the TOML file that defined them and a
//! "did you mean?" suggestion ranked by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity floor below which no key suggestion is offered. 0.75 keeps
/// `bin_di` -> `bin_id` while rejecting unrelated names.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Errors surfaced while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no configuration section declares.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(campusfix::config::unknown_key), help("{help}"))]
    UnknownKey {
        key: String,
        /// Closest declared key, when one is similar enough.
        suggestion: Option<String>,
        help: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A declared key holding a value of the wrong TOML type.
    #[error("bad value for `{key}`: expected {expected}, found {found}")]
    #[diagnostic(code(campusfix::config::bad_value))]
    BadValue {
        key: String,
        expected: String,
        found: String,
    },

    /// A value that deserialized fine but failed a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(campusfix::config::validation))]
    Validation { message: String },

    /// Anything Figment reports that has no richer mapping above.
    #[error("configuration error: {0}")]
    #[diagnostic(code(campusfix::config::other))]
    Other(String),
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` pairs each merged TOML file path with its content so
/// unknown-key diagnostics can point into the file that defined them.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let catalog = SourceCatalog(toml_sources);
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, declared) => {
                let suggestion = suggest_key(field, declared);
                let help = match suggestion.as_deref() {
                    Some(s) => {
                        format!("did you mean `{s}`? Valid keys: {}", declared.join(", "))
                    }
                    None => format!("valid keys: {}", declared.join(", ")),
                };
                let (span, src) = catalog.locate(&error, field);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    help,
                    span,
                    src,
                }
            }
            Kind::InvalidType(found, expected) => ConfigError::BadValue {
                key: error.path.join("."),
                expected: expected.clone(),
                found: found.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// The TOML files that fed the Figment merge, kept around so error spans
/// can point back at the file a bad key came from.
struct SourceCatalog<'a>(&'a [(String, String)]);

impl SourceCatalog<'_> {
    /// Resolve the span of `field` inside whichever catalogued file
    /// produced `error`. Errors from env vars or defaults have no file
    /// source and resolve to nothing.
    fn locate(
        &self,
        error: &figment::error::Error,
        field: &str,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let file = error
            .metadata
            .as_ref()
            .and_then(|m| m.source.as_ref())
            .and_then(|s| match s {
                figment::Source::File(path) => Some(path.display().to_string()),
                _ => None,
            });
        let Some(path) = file else {
            return (None, None);
        };
        let Some((_, content)) = self.0.iter().find(|(p, _)| *p == path) else {
            return (None, None);
        };

        let section = error.path.first().map(String::as_str);
        match key_offset(content, section, field) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(path, content.clone())),
            ),
            None => (None, None),
        }
    }
}

/// Byte offset of the key `field` within `content`, searched after the
/// `[section]` header when one is given.
///
/// Only candidates that start a line (modulo indentation) and are followed
/// by `=` or whitespace count, so the same text inside a value string is
/// never mistaken for the key.
fn key_offset(content: &str, section: Option<&str>, field: &str) -> Option<usize> {
    let start = match section {
        Some(name) => {
            let header = format!("[{name}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    content[start..]
        .match_indices(field)
        .map(|(i, _)| start + i)
        .find(|&at| {
            let line_prefix = content[..at]
                .rfind('\n')
                .map_or(&content[..at], |nl| &content[nl + 1..at]);
            let next = content[at + field.len()..].chars().next();
            line_prefix.trim().is_empty() && matches!(next, Some(' ' | '\t' | '=') | None)
        })
}

/// Closest declared key to `unknown` by Jaro-Winkler similarity, if any
/// clears the threshold.
fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    eprint!("{out}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typos_get_a_suggestion() {
        let valid = &["name", "log_level", "operator_name", "operator_title"];
        assert_eq!(
            suggest_key("operator_nme", valid),
            Some("operator_name".to_string())
        );
        let remote = &["enabled", "base_url", "bin_id", "api_key", "timeout_secs"];
        assert_eq!(suggest_key("bin_di", remote), Some("bin_id".to_string()));
    }

    #[test]
    fn distant_names_get_no_suggestion() {
        assert_eq!(suggest_key("zzzzzz", &["name", "log_level"]), None);
    }

    #[test]
    fn key_offset_searches_below_the_section_header() {
        let content = "bin_di = \"top\"\n[remote]\nenabled = true\nbin_di = \"64f0c1\"\n";
        let at = key_offset(content, Some("remote"), "bin_di").unwrap();
        assert_eq!(&content[at..at + 6], "bin_di");
        assert!(at > content.find("[remote]").unwrap());
    }

    #[test]
    fn key_offset_ignores_matches_inside_values() {
        let content = "[service]\nname = \"bin_di\"\n";
        assert_eq!(key_offset(content, Some("service"), "bin_di"), None);
    }

    #[test]
    fn top_level_keys_resolve_without_a_section() {
        let content = "# comment\nstray = 1\n";
        let at = key_offset(content, None, "stray").unwrap();
        assert_eq!(&content[at..at + 5], "stray");
    }
}
