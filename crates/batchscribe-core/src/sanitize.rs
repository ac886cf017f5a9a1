//! Removal of engine-internal control markers from raw transcript text

use regex::Regex;
use std::sync::LazyLock;

/// All recognized engine control markers: numbered extra tokens, numbered
/// timestamp tokens, and the fixed sentinels for start/end of transcript,
/// previous context, no-speech, and beginning of segment.
static MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[_extra_token_\d+\]|\[_TT_\d+\]|\[_SOT_\]|\[_EOT_\]|\[_PREV_\]|\[_NOT_\]|\[_BEG_\]",
    )
    .expect("marker pattern is valid")
});

/// Strip engine control markers from a raw transcript and trim the result.
///
/// Marker removal runs to a fixed point so that markers re-formed by the
/// removal of an embedded token are also stripped, which makes the function
/// idempotent. Empty input passes through unchanged.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut current = raw.to_string();
    loop {
        let next = MARKERS.replace_all(&current, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }

    current.trim().to_string()
}
