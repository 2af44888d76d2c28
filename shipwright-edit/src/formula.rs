//! Homebrew formula patcher for release publication.
//!
//! A formula pins the release tarball url and its sha256; shipping a new
//! version rewrites both in the tap repo.

use regex::Regex;

/// Rewrite the `url` and `sha256` stanzas of a Homebrew formula.
///
/// `version` replaces the version segment embedded in the download url
/// (`.../v<version>.tar.gz` or `...-<version>.tar.gz`); `sha256` replaces
/// the digest literal. Content without the stanzas is returned unchanged.
pub fn update_formula(content: &str, version: &str, sha256: &str) -> String {
    let url_re = Regex::new(r#"(url\s+"[^"]*?)\d+\.\d+\.\d+([^"]*")"#).expect("static url pattern");
    let sha_re = Regex::new(r#"(sha256\s+")[0-9a-f]{64}(")"#).expect("static sha pattern");

    let updated = url_re
        .replace_all(content, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", &caps[1], version, &caps[2])
        })
        .into_owned();

    sha_re
        .replace_all(&updated, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", &caps[1], sha256, &caps[2])
        })
        .into_owned()
}
