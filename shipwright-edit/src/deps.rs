//! package.json dependency version bumps.
//!
//! Edits are targeted string replacements so the file keeps its formatting;
//! a JSON round-trip would reorder keys and normalize whitespace.

use regex::Regex;

/// Rewrite the version range of `name` in a package.json's dependency
/// tables. Returns the content unchanged when the dependency is absent.
pub fn update_dependency_version(content: &str, name: &str, version: &str) -> String {
    let pattern = format!(r#""{}"(\s*:\s*)"[^"]*""#, regex::escape(name));
    let re = Regex::new(&pattern).expect("static dependency pattern");

    re.replace_all(content, |caps: &regex::Captures<'_>| {
        format!(r#""{}"{}"{}""#, name, &caps[1], version)
    })
    .into_owned()
}
