use regex::Regex;
use std::sync::LazyLock;

/// Segments that mark the end of a module's directory prefix.
const MARKER_SEGMENTS: [&str; 2] = ["Public", "Sources"];

/// Segment index the default identifier stops at when no marker is present.
const FALLBACK_END: usize = 3;

/// Modules known to nest one level deeper than the rest of the tree.
///
/// Each pattern matches the default identifier and keeps everything up to and
/// including the nested segment; whatever follows it is dropped. The first
/// matching rule wins.
static OVERRIDE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(.*)(/Config[a-zA-Z_-]+?)/",
        r"(.*)(/MeasurementSystemDriver/IMS)/",
        r"(.*)(/Drivers_RX_common)/",
        r"(.*)(/DisplayLib)/",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("override pattern is a valid regex"))
    .collect()
});

/// Resolve the module identifier for a repository-relative path.
///
/// The first segment (the repository root) is always dropped. The identifier
/// runs up to the last `Public` or `Sources` segment, or to segment index 3 when
/// neither appears. The override table is then applied to the result.
pub fn resolve_module(path: &str) -> String {
    let default = default_identifier(path);
    apply_overrides(&default).unwrap_or(default)
}

fn default_identifier(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();

    let end = match segments
        .iter()
        .rposition(|seg| MARKER_SEGMENTS.contains(seg))
    {
        // A marker in the root position counts as no marker at all.
        Some(0) | None => FALLBACK_END,
        Some(i) => i,
    };
    let end = end.min(segments.len());

    if end <= 1 {
        return String::new();
    }
    segments[1..end].join("/")
}

fn apply_overrides(identifier: &str) -> Option<String> {
    OVERRIDE_RULES.iter().find_map(|rule| {
        rule.captures(identifier)
            .map(|caps| format!("{}{}", &caps[1], &caps[2]))
    })
}
