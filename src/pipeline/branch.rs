use regex::Regex;
use std::sync::LazyLock;

/// A branch is eligible iff its reference ends in `doc/readme`, any casing.
static DOC_README: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)doc/readme$").expect("valid pattern"));

/// Single source of truth for branch eligibility.
pub fn is_doc_readme(reference: &str) -> bool {
    doc_readme_token(reference).is_some()
}

/// The matched `doc/readme` token as it appears in `reference`, for display
/// and as the merge source branch. `None` means not eligible (fail closed).
pub fn doc_readme_token(reference: &str) -> Option<&str> {
    DOC_README.find(reference).map(|m| m.as_str())
}
