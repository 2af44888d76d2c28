//! Import rewriting: collapse deep module imports to the package root.
//!
//! Deep paths like `@atomist/sdm/lib/api/goal` reach into a package's
//! internals and break when the package reshuffles its tree; the package
//! root re-exports the supported surface.

use regex::Regex;

/// Rewrite `import`/`require` specifiers of the form `<module>/lib/...` to
/// `<module>`. Only quoted module specifiers are touched.
pub fn rewrite_deep_imports(content: &str, module: &str) -> String {
    let pattern = format!(r#"(["']){}/lib/[^"']+(["'])"#, regex::escape(module));
    let re = Regex::new(&pattern).expect("static import pattern");

    re.replace_all(content, |caps: &regex::Captures<'_>| {
        format!("{}{}{}", &caps[1], module, &caps[2])
    })
    .into_owned()
}
