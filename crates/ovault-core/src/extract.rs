//! Pure text extractors over raw note content.
//!
//! Patterns are compiled once and shared as immutable constants. Tag
//! scanning strips fenced and inline code first so code samples never
//! contribute tags; Markdown headings share the `#` prefix but are
//! excluded because a tag's `#` must follow whitespace and be glued to
//! the tag text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::frontmatter::{FmValue, FrontmatterCodec};

/// `[[Target]]` or `[[Target|alias]]`; only the target is captured.
static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]+)?\]\]").unwrap());

/// Inline `#tag` token: the `#` must follow a whitespace character (or
/// sit at the very start of the text) and be glued to
/// alnum/underscore/hyphen/slash tag text. Headings fail the glue rule
/// because their `#` is followed by a space.
static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z0-9_/-]+)").unwrap());

/// Fallback for a `tags:` front-matter line when structured parsing
/// yields nothing: captures the bracketed or bare value.
static FM_TAGS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^tags:\s*\[?(.*?)\]?\s*$").unwrap());

/// Checkbox list item: indent, single status character, text.
static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)-\s\[(.)\]\s+(.*)$").unwrap());

/// Fenced code block, non-greedy, spanning newlines.
static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// Inline code span; no newlines inside.
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").unwrap());

/// Remove fenced code blocks and inline code spans.
///
/// Fenced blocks go first so inline spans cannot mis-parse fence
/// markers.
pub fn strip_code(content: &str) -> String {
    let without_fences = FENCED_CODE.replace_all(content, "");
    INLINE_CODE.replace_all(&without_fences, "").into_owned()
}

/// Extract the canonical tag set of a note: inline `#tags` from the
/// code-stripped text plus front-matter `tags`, deduplicated and sorted.
///
/// Front-matter tags come from the structured codec when it yields a
/// `tags` value (list, or comma-separated string); otherwise a
/// line-pattern fallback scans for a `tags:` line.
pub fn extract_tags(content: &str, codec: &dyn FrontmatterCodec) -> Vec<String> {
    let mut tags: BTreeSet<String> = BTreeSet::new();

    let stripped = strip_code(content);
    for cap in INLINE_TAG.captures_iter(&stripped) {
        tags.insert(cap[1].to_string());
    }

    let structured = codec
        .parse(content)
        .and_then(|fm| fm.get("tags").cloned());
    match structured {
        Some(value) => {
            tags.extend(tags_from_value(&value));
        }
        None => {
            for cap in FM_TAGS_LINE.captures_iter(content) {
                for token in cap[1].split(|c: char| c == ',' || c.is_whitespace()) {
                    let token = token.trim_matches(|c| c == '\'' || c == '"' || c == '#');
                    if !token.is_empty() {
                        tags.insert(token.to_string());
                    }
                }
            }
        }
    }

    tags.into_iter().collect()
}

fn tags_from_value(value: &FmValue) -> Vec<String> {
    let raw: Vec<String> = match value {
        FmValue::List(items) => items.iter().map(FmValue::to_display_string).collect(),
        FmValue::String(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
        other => vec![other.to_display_string()],
    };
    raw.into_iter().filter(|t: &String| !t.is_empty()).collect()
}

/// Extract outgoing wikilink targets, deduplicated and sorted.
pub fn extract_wikilinks(content: &str) -> Vec<String> {
    let mut links: BTreeSet<String> = BTreeSet::new();
    for cap in WIKILINK.captures_iter(content) {
        links.insert(cap[1].to_string());
    }
    links.into_iter().collect()
}

/// A checkbox list item parsed from a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    /// Leading whitespace, preserved verbatim on rewrite.
    pub indent: String,
    /// Status character inside the brackets; space means incomplete.
    pub status: char,
    /// Task text after the checkbox.
    pub text: String,
}

impl TaskLine {
    /// Whether the task is complete (any non-space status).
    pub fn is_done(&self) -> bool {
        self.status != ' '
    }

    /// The status after a toggle: space flips to `x`, anything else to
    /// space.
    pub fn toggled_status(&self) -> char {
        if self.status == ' ' {
            'x'
        } else {
            ' '
        }
    }

    /// Render the task as a line with the given status character.
    pub fn to_line(&self, status: char) -> String {
        format!("{}- [{}] {}", self.indent, status, self.text)
    }
}

/// Parse a single line as a task, if it matches the checkbox pattern
/// exactly. Extra leading markers (e.g. a blockquote prefix) disqualify
/// the line.
pub fn parse_task_line(line: &str) -> Option<TaskLine> {
    TASK_LINE.captures(line).map(|cap| TaskLine {
        indent: cap[1].to_string(),
        status: cap[2].chars().next().unwrap_or(' '),
        text: cap[3].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::{NullCodec, YamlCodec};
    use proptest::prelude::*;

    #[test]
    fn inline_tags_extracted_sorted_and_deduped() {
        let tags = extract_tags("note #beta text #alpha more #beta", &NullCodec);
        assert_eq!(tags, vec!["alpha", "beta"]);
    }

    #[test]
    fn heading_is_not_a_tag() {
        let tags = extract_tags("# Heading\n\nbody text\n## Another\n", &NullCodec);
        assert!(tags.is_empty());
    }

    #[test]
    fn tag_boundaries_are_whitespace_or_text_start() {
        assert_eq!(extract_tags("#first rest", &NullCodec), vec!["first"]);
        assert_eq!(extract_tags("\n#first", &NullCodec), vec!["first"]);
        assert!(extract_tags("not#glued", &NullCodec).is_empty());
    }

    #[test]
    fn tags_in_code_are_ignored() {
        let content = "real #tag\n\n```\n#fenced\n```\nand `#inline` too";
        assert_eq!(extract_tags(content, &NullCodec), vec!["tag"]);
    }

    #[test]
    fn nested_tags_keep_slashes() {
        let tags = extract_tags("work #project/alpha done", &NullCodec);
        assert_eq!(tags, vec!["project/alpha"]);
    }

    #[test]
    fn frontmatter_list_tags_union_with_inline() {
        let content = "---\ntags:\n  - yaml1\n  - yaml2\n---\nbody #inline\n";
        let tags = extract_tags(content, &YamlCodec);
        assert_eq!(tags, vec!["inline", "yaml1", "yaml2"]);
    }

    #[test]
    fn frontmatter_string_tags_split_on_commas() {
        let content = "---\ntags: one, two\n---\n";
        let tags = extract_tags(content, &YamlCodec);
        assert_eq!(tags, vec!["one", "two"]);
    }

    #[test]
    fn fallback_line_pattern_handles_disabled_codec() {
        let content = "---\ntags: [a, 'b', \"c\"]\n---\nbody\n";
        let tags = extract_tags(content, &NullCodec);
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn fallback_line_pattern_handles_corrupt_frontmatter() {
        let content = "---\ntitle: [unclosed\ntags: x, y\n---\n";
        let tags = extract_tags(content, &YamlCodec);
        assert_eq!(tags, vec!["x", "y"]);
    }

    #[test]
    fn strip_code_removes_fenced_before_inline() {
        let content = "keep ```fenced `stuff` inside``` and `span` end";
        assert_eq!(strip_code(content), "keep  and  end");
    }

    #[test]
    fn wikilinks_dedupe_alias_forms() {
        let links = extract_wikilinks("[[A]] and [[A|alias]] and [[B]]");
        assert_eq!(links, vec!["A", "B"]);
    }

    #[test]
    fn task_line_parses_indent_status_text() {
        let task = parse_task_line("  - [x] ship the release").unwrap();
        assert_eq!(task.indent, "  ");
        assert_eq!(task.status, 'x');
        assert_eq!(task.text, "ship the release");
        assert!(task.is_done());
    }

    #[test]
    fn task_line_rejects_non_tasks() {
        assert!(parse_task_line("- no checkbox here").is_none());
        assert!(parse_task_line("> - [ ] quoted task").is_none());
        assert!(parse_task_line("* [ ] wrong bullet").is_none());
        assert!(parse_task_line("- [xx] two status chars").is_none());
    }

    #[test]
    fn task_toggle_round_trips() {
        let task = parse_task_line("- [ ] todo item").unwrap();
        assert_eq!(task.toggled_status(), 'x');
        let line = task.to_line(task.toggled_status());
        assert_eq!(line, "- [x] todo item");
        let back = parse_task_line(&line).unwrap();
        assert_eq!(back.toggled_status(), ' ');
        assert_eq!(back.to_line(back.toggled_status()), "- [ ] todo item");
    }

    #[test]
    fn extraction_is_idempotent_over_stripped_text() {
        let content = "a #one ```\n#two\n``` b #three `#four`";
        let direct = extract_tags(content, &NullCodec);
        let pre_stripped = extract_tags(&strip_code(content), &NullCodec);
        assert_eq!(direct, pre_stripped);
        assert_eq!(direct, vec!["one", "three"]);
    }

    proptest! {
        #[test]
        fn tags_inside_fences_never_surface(tag in "[a-z]{1,8}") {
            let text = format!("```\n#{tag}\n```\nplain text");
            prop_assert!(extract_tags(&text, &NullCodec).is_empty());
        }

        #[test]
        fn extraction_is_order_independent(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            let one = extract_tags(&format!("x #{a} y #{b}"), &NullCodec);
            let two = extract_tags(&format!("x #{b} y #{a}"), &NullCodec);
            prop_assert_eq!(one, two);
        }
    }
}
