//! Lexical normalization of client-supplied upload paths.
//!
//! Nothing here touches the filesystem. A path is reduced to a canonical
//! `/`-separated form: `\` becomes `/`, empty and `.` segments are dropped,
//! and `name/..` pairs cancel. Leading `..` segments that would climb above
//! the start are kept as-is; callers decide what to do with them.

/// Normalize `raw`, optionally placing it under `root_prefix` first.
///
/// Returns `"."` for a path that reduces to nothing.
pub fn normalize(raw: &str, root_prefix: Option<&str>) -> String {
    let joined = match root_prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/{raw}"),
        _ => raw.to_string(),
    };
    let joined = joined.replace('\\', "/");

    let absolute = joined.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `/..` is `/`.
                None if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Split a normalized path into its segments, root to leaf.
///
/// `"."` and `"/"` have no segments.
pub fn segments(normalized: &str) -> Vec<&str> {
    normalized
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Whether a leaf segment names a file rather than a folder.
///
/// A segment is a file when it contains a `.`. Folders whose names contain
/// a dot (`v1.2`) are therefore taken for files; uploads cannot currently
/// create such folders from paths.
pub fn is_file_segment(segment: &str) -> bool {
    segment.contains('.')
}

/// Whether a normalized path points outside the tree it was given for:
/// absolute, or starting with `..`.
pub fn escapes_root(normalized: &str) -> bool {
    normalized.starts_with('/') || segments(normalized).first() == Some(&"..")
}
