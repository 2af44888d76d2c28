use shipwright_types::review::ReviewComment;
use std::cmp::Ordering;

/// Total order over review comments: severity rank, then category, then
/// subcategory, then source path, then offset.
///
/// Comments without a source location order before located comments when all
/// other keys tie, so file-level comments lead their group.
pub fn compare_review_comments(a: &ReviewComment, b: &ReviewComment) -> Ordering {
    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.subcategory.cmp(&b.subcategory))
        .then_with(|| compare_locations(a, b))
}

fn compare_locations(a: &ReviewComment, b: &ReviewComment) -> Ordering {
    match (&a.source_location, &b.source_location) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(la), Some(lb)) => la
            .path
            .cmp(&lb.path)
            .then_with(|| la.offset.cmp(&lb.offset)),
    }
}

/// Sort comments in place into review order.
pub fn sort_review_comments(comments: &mut [ReviewComment]) {
    comments.sort_by(compare_review_comments);
}
