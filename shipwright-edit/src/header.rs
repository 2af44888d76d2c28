//! License header detection and insertion.
//!
//! A file either already carries the wanted header, carries some *other*
//! block comment at the top (left alone, flagged for manual review), or has
//! no header at all (header prepended). An initial interpreter directive
//! (`#!...`) line stays the first line of the file.

/// Outcome of classifying a file against a target header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAction {
    /// The file already starts with the wanted header.
    UpToDate,
    /// The file starts with a different block comment; needs manual review.
    DifferentHeader,
    /// The header was prepended; the new content is carried along.
    Updated(String),
}

/// True only when the content opens with a block comment that is not the
/// wanted header. Headerless content and up-to-date content both return
/// false.
pub fn has_different_header(header: &str, content: &str) -> bool {
    let body = skip_shebang(content);
    if body.starts_with(header) {
        return false;
    }
    body.trim_start().starts_with("/*")
}

/// Classify `content` against `header` and prepend the header when missing.
pub fn upsert_header(header: &str, content: &str) -> HeaderAction {
    let (shebang, body) = split_shebang(content);

    if body.starts_with(header) {
        return HeaderAction::UpToDate;
    }
    if body.trim_start().starts_with("/*") {
        return HeaderAction::DifferentHeader;
    }

    let mut updated = String::with_capacity(header.len() + content.len() + 2);
    if let Some(shebang) = shebang {
        updated.push_str(shebang);
        updated.push('\n');
    }
    updated.push_str(header);
    if !header.ends_with('\n') {
        updated.push('\n');
    }
    if !body.is_empty() && !body.starts_with('\n') {
        updated.push('\n');
    }
    updated.push_str(body);
    HeaderAction::Updated(updated)
}

fn skip_shebang(content: &str) -> &str {
    split_shebang(content).1
}

/// Split off an initial `#!` line. The returned body excludes the newline
/// that terminated the shebang.
fn split_shebang(content: &str) -> (Option<&str>, &str) {
    if !content.starts_with("#!") {
        return (None, content);
    }
    match content.find('\n') {
        Some(idx) => (Some(&content[..idx]), &content[idx + 1..]),
        None => (Some(content), ""),
    }
}
