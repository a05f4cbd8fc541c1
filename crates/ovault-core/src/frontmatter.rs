//! YAML front-matter parsing.
//!
//! A note may begin with a `---` delimited YAML block:
//! ```markdown
//! ---
//! title: "Alpha"
//! tags: [rust, notes]
//! ---
//!
//! Body content here
//! ```
//!
//! An absent block means empty metadata, not an error, and a corrupt
//! block must never fail the enclosing operation.

use std::collections::BTreeMap;

use serde::Serialize;

/// Parsed front-matter: key → value mapping, ordered by key.
pub type FmMap = BTreeMap<String, FmValue>;

/// A front-matter value, preserving the scalar and list shapes notes use.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FmValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FmValue>),
}

impl FmValue {
    fn from_yaml(value: &serde_yaml::Value) -> Option<FmValue> {
        use serde_yaml::Value;
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FmValue::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => FmValue::Int(i),
                None => FmValue::Float(n.as_f64().unwrap_or(0.0)),
            }),
            Value::String(s) => Some(FmValue::String(s.clone())),
            Value::Sequence(items) => Some(FmValue::List(
                items.iter().filter_map(FmValue::from_yaml).collect(),
            )),
            // Nested mappings and tagged values are outside the model;
            // keep their YAML form as a string.
            other => serde_yaml::to_string(other)
                .ok()
                .map(|s| FmValue::String(s.trim_end().to_string())),
        }
    }

    /// Scalar display form, used when front-matter values feed tag sets.
    pub fn to_display_string(&self) -> String {
        match self {
            FmValue::Bool(b) => b.to_string(),
            FmValue::Int(i) => i.to_string(),
            FmValue::Float(f) => f.to_string(),
            FmValue::String(s) => s.clone(),
            FmValue::List(items) => items
                .iter()
                .map(FmValue::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Split a note into its front-matter YAML and body.
///
/// Returns `(yaml, body)` when the note starts with a `---` fence and a
/// closing `---` exists, `None` otherwise. The block must sit at the very
/// start of the file.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let after_open = content.strip_prefix("---")?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let close_pos = after_open.find("\n---")?;
    let yaml = &after_open[..close_pos];
    let rest = &after_open[close_pos + 4..];

    // Skip the newline after the closing ---
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    Some((yaml, body))
}

/// Capability interface for structured front-matter parsing.
///
/// Selected once at startup and shared by every handler; the disabled
/// implementation reports "no front-matter" for every note so the
/// regex fallback path in tag extraction takes over.
pub trait FrontmatterCodec: Send + Sync {
    /// Parse the front-matter block of `content`, if any.
    ///
    /// Returns `None` when the note has no block or the block does not
    /// parse as a mapping.
    fn parse(&self, content: &str) -> Option<FmMap>;
}

/// Full YAML front-matter parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl FrontmatterCodec for YamlCodec {
    fn parse(&self, content: &str) -> Option<FmMap> {
        let (yaml, _body) = split_frontmatter(content)?;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).ok()?;
        let mapping = value.as_mapping()?;

        let mut map = FmMap::new();
        for (key, val) in mapping {
            let key = match key.as_str() {
                Some(s) => s.to_string(),
                None => serde_yaml::to_string(key).ok()?.trim_end().to_string(),
            };
            if let Some(parsed) = FmValue::from_yaml(val) {
                map.insert(key, parsed);
            }
        }
        Some(map)
    }
}

/// Disabled front-matter parser: every note reports no front-matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCodec;

impl FrontmatterCodec for NullCodec {
    fn parse(&self, _content: &str) -> Option<FmMap> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_frontmatter_extracts_yaml_and_body() {
        let content = "---\ntitle: Alpha\ntags: [a, b]\n---\n\n## Hello\n";
        let (yaml, body) = split_frontmatter(content).unwrap();
        assert!(yaml.contains("title: Alpha"));
        assert!(yaml.contains("tags: [a, b]"));
        assert!(body.contains("## Hello"));
    }

    #[test]
    fn split_frontmatter_requires_opening_fence_at_start() {
        assert!(split_frontmatter("title: Alpha\n---\n").is_none());
        assert!(split_frontmatter("\n---\ntitle: Alpha\n---\n").is_none());
    }

    #[test]
    fn split_frontmatter_requires_closing_fence() {
        assert!(split_frontmatter("---\ntitle: Alpha\n").is_none());
    }

    #[test]
    fn yaml_codec_parses_scalars_and_lists() {
        let content = "---\ntitle: Alpha\ncount: 3\nratio: 0.5\ndraft: true\ntags:\n  - rust\n  - notes\n---\nbody\n";
        let fm = YamlCodec.parse(content).unwrap();
        assert_eq!(fm["title"], FmValue::String("Alpha".to_string()));
        assert_eq!(fm["count"], FmValue::Int(3));
        assert_eq!(fm["ratio"], FmValue::Float(0.5));
        assert_eq!(fm["draft"], FmValue::Bool(true));
        assert_eq!(
            fm["tags"],
            FmValue::List(vec![
                FmValue::String("rust".to_string()),
                FmValue::String("notes".to_string()),
            ])
        );
    }

    #[test]
    fn yaml_codec_returns_none_without_block() {
        assert!(YamlCodec.parse("# Just a note\n").is_none());
    }

    #[test]
    fn yaml_codec_returns_none_on_corrupt_block() {
        let content = "---\ntitle: [unclosed\n---\nbody\n";
        assert!(YamlCodec.parse(content).is_none());
    }

    #[test]
    fn yaml_codec_drops_null_values() {
        let content = "---\ntitle: Alpha\nempty:\n---\n";
        let fm = YamlCodec.parse(content).unwrap();
        assert!(fm.contains_key("title"));
        assert!(!fm.contains_key("empty"));
    }

    #[test]
    fn null_codec_reports_no_frontmatter() {
        let content = "---\ntitle: Alpha\n---\nbody\n";
        assert!(NullCodec.parse(content).is_none());
    }

    #[test]
    fn fm_values_serialize_untagged() {
        let fm = YamlCodec
            .parse("---\ntags: [a, 1]\ndraft: false\n---\n")
            .unwrap();
        let json = serde_json::to_string(&fm).unwrap();
        assert_eq!(json, r#"{"draft":false,"tags":["a",1]}"#);
    }

    #[test]
    fn display_string_joins_lists() {
        let value = FmValue::List(vec![FmValue::String("a".to_string()), FmValue::Int(2)]);
        assert_eq!(value.to_display_string(), "a, 2");
    }
}
