//! Plain-text previews of rich-text content.
//!
//! Document content is an opaque markup string everywhere else in the
//! system; this module strips it to plain text for list previews only.
//! It never feeds the version-recording decision.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Default preview length used by the document list endpoint.
pub const DEFAULT_PREVIEW_CHARS: usize = 160;

/// Strip markup from `content` and truncate to at most `max_chars`
/// characters, appending an ellipsis when truncated.
///
/// Tags are removed, the basic named entities decoded, and whitespace runs
/// collapsed to single spaces. Truncation counts characters, not bytes, so
/// multi-byte text never splits mid-character.
pub fn plain_text(content: &str, max_chars: usize) -> String {
    let stripped = TAG_RE.replace_all(content, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    let collapsed = WHITESPACE_RE.replace_all(decoded.trim(), " ");

    if collapsed.chars().count() <= max_chars {
        return collapsed.into_owned();
    }

    let truncated: String = collapsed.chars().take(max_chars).collect();
    format!("{}…", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags() {
        assert_eq!(
            plain_text("<h1>Hello</h1><p>world</p>", 100),
            "Hello world"
        );
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(plain_text("  <p>a</p>\n\n<p>b</p>  ", 100), "a b");
    }

    #[test]
    fn decodes_basic_entities() {
        assert_eq!(
            plain_text("<p>Fish &amp; chips &lt;today&gt;</p>", 100),
            "Fish & chips <today>"
        );
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(plain_text("<p>abcdefgh</p>", 4), "abcd…");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = plain_text("<p>héllo wörld</p>", 6);
        assert_eq!(text, "héllo…");
    }

    #[test]
    fn empty_content_yields_empty_preview() {
        assert_eq!(plain_text("", 100), "");
        assert_eq!(plain_text("<p></p>", 100), "");
    }
}
