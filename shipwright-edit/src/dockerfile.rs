//! Dockerfile npm module pin patcher.
//!
//! Release glue: when a new version of a globally installed npm module ships,
//! the Dockerfiles that install it get their pin rewritten.

use regex::Regex;
use std::borrow::Cow;

/// Rewrite the version pin of `module` in every `npm install`/`npm i`
/// invocation found in `content`.
///
/// Flags between the verb and the module name are preserved verbatim. An
/// unpinned invocation gains a pin. Content without a matching invocation is
/// returned unchanged, and the function is idempotent.
pub fn update_npm_install(content: &str, module: &str, version: &str) -> String {
    // The trailing group pins the match to the end of the module token so
    // `tool` never rewrites `tool-extra`.
    let pattern = format!(
        r"(npm\s+(?:install|i)\s+(?:--?[A-Za-z][\w-]*(?:=\S+)?\s+)*){}(?:@\S+)?(\s|$)",
        regex::escape(module)
    );
    // The pattern is valid for every escaped module name; a failure here is
    // a programming error in the pattern itself.
    let re = Regex::new(&pattern).expect("static npm install pattern");

    match re.replace_all(content, |caps: &regex::Captures<'_>| {
        format!("{}{}@{}{}", &caps[1], module, version, &caps[2])
    }) {
        Cow::Borrowed(_) => content.to_string(),
        Cow::Owned(updated) => updated,
    }
}
