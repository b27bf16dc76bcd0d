//! Postgres implementations of the store traits.

pub mod document;
pub mod folder;

pub use document::DocumentRepository;
pub use folder::FolderRepository;

/// Build an `ILIKE` pattern matching `needle` anywhere, with the LIKE
/// metacharacters in `needle` escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
