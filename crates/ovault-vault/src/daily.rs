//! Daily note creation.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use ovault_core::{Result, VaultError};

use crate::context::VaultContext;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TITLE_FORMAT: &str = "%Y-%m-%d %A";

/// Outcome of a daily-note call: either the freshly created note or
/// the content of an already existing one.
#[derive(Debug, Clone, Serialize)]
pub struct DailyNoteOutcome {
    pub status: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Create the daily note for `date` (default: today, local time).
///
/// An existing note is returned with its content instead of erroring.
/// A template note, when given and present, has `{{date}}` and
/// `{{title}}` substituted; otherwise the content is a dated heading.
pub fn daily_note(
    ctx: &VaultContext,
    date_raw: Option<&str>,
    folder: Option<&str>,
    template: Option<&str>,
) -> Result<DailyNoteOutcome> {
    let date = match date_raw {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
            VaultError::InvalidInput("Invalid date format. Use YYYY-MM-DD.".to_string())
        })?,
        None => Local::now().date_naive(),
    };

    let filename = format!("{}.md", date.format(DATE_FORMAT));
    let rel_path = match folder {
        Some(f) if !f.is_empty() => format!("{f}/{filename}"),
        _ => filename,
    };
    let path = ctx.resolve(&rel_path)?;

    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        return Ok(DailyNoteOutcome {
            status: "already_exists",
            path: ctx.relative(&path),
            date: None,
            content: Some(content),
        });
    }

    let mut content = format!("# {}\n\n", date.format(TITLE_FORMAT));
    if let Some(template_raw) = template {
        let template_path = ctx.resolve(template_raw)?;
        if template_path.is_file() {
            if let Ok(text) = std::fs::read_to_string(&template_path) {
                content = text
                    .replace("{{date}}", &date.format(DATE_FORMAT).to_string())
                    .replace("{{title}}", &date.format(TITLE_FORMAT).to_string());
            }
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &content)?;
    Ok(DailyNoteOutcome {
        status: "created",
        path: ctx.relative(&path),
        date: Some(date.format(DATE_FORMAT).to_string()),
        content: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault() -> (TempDir, VaultContext) {
        let dir = TempDir::new().unwrap();
        let ctx = VaultContext::open(dir.path()).unwrap();
        (dir, ctx)
    }

    #[test]
    fn creates_note_with_dated_heading() {
        let (_dir, ctx) = vault();
        let outcome = daily_note(&ctx, Some("2099-01-01"), None, None).unwrap();
        assert_eq!(outcome.status, "created");
        assert_eq!(outcome.path, "2099-01-01.md");
        assert_eq!(outcome.date.as_deref(), Some("2099-01-01"));

        let content = std::fs::read_to_string(ctx.root().join("2099-01-01.md")).unwrap();
        // 2099-01-01 is a Thursday.
        assert_eq!(content, "# 2099-01-01 Thursday\n\n");
    }

    #[test]
    fn existing_note_is_returned_not_overwritten() {
        let (_dir, ctx) = vault();
        std::fs::write(ctx.root().join("2099-01-01.md"), "kept").unwrap();

        let outcome = daily_note(&ctx, Some("2099-01-01"), None, None).unwrap();
        assert_eq!(outcome.status, "already_exists");
        assert_eq!(outcome.content.as_deref(), Some("kept"));
    }

    #[test]
    fn template_placeholders_are_substituted() {
        let (_dir, ctx) = vault();
        std::fs::write(
            ctx.root().join("Template.md"),
            "Daily Note: {{date}}\n\n## {{title}}\n",
        )
        .unwrap();

        daily_note(&ctx, Some("2099-01-01"), None, Some("Template.md")).unwrap();
        let content = std::fs::read_to_string(ctx.root().join("2099-01-01.md")).unwrap();
        assert!(content.contains("Daily Note: 2099-01-01"));
        assert!(content.contains("## 2099-01-01 Thursday"));
    }

    #[test]
    fn folder_argument_nests_the_note() {
        let (_dir, ctx) = vault();
        let outcome = daily_note(&ctx, Some("2099-01-01"), Some("journal"), None).unwrap();
        assert_eq!(outcome.path, "journal/2099-01-01.md");
        assert!(ctx.root().join("journal/2099-01-01.md").is_file());
    }

    #[test]
    fn invalid_date_is_rejected() {
        let (_dir, ctx) = vault();
        let err = daily_note(&ctx, Some("01/02/2099"), None, None).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }
}
