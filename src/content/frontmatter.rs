//! Front-matter parsing for markdown posts

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};

/// Metadata header of a markdown post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
}

impl FrontMatter {
    /// Split a document into its front matter and body.
    ///
    /// Documents without a recognisable header yield the default front
    /// matter and the whole (left-trimmed) text as body.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start();

        if let Some(rest) = content.strip_prefix("---") {
            return Ok(Self::parse_yaml(content, rest));
        }

        if let Some(rest) = content.strip_prefix(";;;") {
            let end = rest
                .find(";;;")
                .ok_or_else(|| ContentError::Parse("unterminated ;;; front matter".into()))?;
            let fm = serde_json::from_str(&rest[..end])?;
            return Ok((fm, trim_newlines(&rest[end + 3..])));
        }

        if content.starts_with('{') {
            let end = json_object_end(content)
                .ok_or_else(|| ContentError::Parse("unterminated JSON front matter".into()))?;
            let fm = serde_json::from_str(&content[..end])?;
            return Ok((fm, trim_newlines(&content[end..])));
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml<'a>(content: &'a str, rest: &'a str) -> (Self, &'a str) {
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };
        let header = &rest[..end];
        let body = trim_newlines(&rest[end + 4..]);

        if header.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        // A leading horizontal rule followed by prose is not front matter
        if !header.lines().any(looks_like_yaml_key) {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(header) {
            Ok(fm) => (fm, body),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, treating as content: {}", e);
                (FrontMatter::default(), content)
            }
        }
    }

    /// Parsed `date`, used to order posts newest-first
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

fn trim_newlines(s: &str) -> &str {
    s.trim_start_matches(['\n', '\r'])
}

/// `key: value` or `key:` with a plain identifier key
fn looks_like_yaml_key(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return false;
    }
    let Some((key, value)) = line.split_once(':') else {
        return false;
    };
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp")
        && (value.is_empty() || value.starts_with(' '))
}

/// Byte offset just past the brace closing the leading JSON object
fn json_object_end(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a front-matter date in the formats authors commonly write
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = "---\ntitle: Hi\ndate: 2024-01-01\nexcerpt: Hello\n---\nWorld";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hi"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-01"));
        assert_eq!(fm.excerpt.as_deref(), Some("Hello"));
        assert_eq!(body, "World");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = "{\"title\": \"Brace } inside\", \"excerpt\": \"x\"}\n\nBody text.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Brace } inside"));
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_parse_semicolon_frontmatter() {
        let content = ";;;\n{\"title\": \"Fenced\"}\n;;;\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fenced"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unterminated_json_is_an_error() {
        assert!(FrontMatter::parse("{\"title\": \"open\"").is_err());
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, body) = FrontMatter::parse("\n\nJust text.").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Just text.");
    }

    #[test]
    fn test_horizontal_rule_not_yaml() {
        let content = "---\nCheck out https://example.com and read on.\n---\nMore.";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(body.contains("https://example.com"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (fm, body) =
            FrontMatter::parse("---\ntitle: Draft\npublished: false\n---\nwip").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Draft"));
        assert_eq!(body, "wip");
    }

    #[test]
    fn test_parse_dates() {
        let day = parse_date_string("2024-01-15").unwrap();
        assert_eq!(day.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 00:00");

        let dt = parse_date_string("2024/01/15 10:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "10:30");

        assert!(parse_date_string("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date_string("yesterday").is_none());
    }
}
