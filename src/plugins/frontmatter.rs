//! Frontmatter parsing for command prompt files.
//!
//! A prompt file may start with a `---` delimited block of `key: value`
//! lines. Everything after the closing delimiter line is the body.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static FRONTMATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)")
        .expect("frontmatter regex is valid")
});

/// Header fields and body of a prompt file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub fields: BTreeMap<String, String>,
    pub body: String,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Split `content` into frontmatter fields and body.
///
/// Without a complete delimited header the map is empty and the body is the
/// whole input. Header lines without a colon are ignored; keys and values
/// are trimmed and a repeated key keeps its last value.
pub fn parse_frontmatter(content: &str) -> Frontmatter {
    let Some(captures) = FRONTMATTER_RE.captures(content) else {
        return Frontmatter {
            fields: BTreeMap::new(),
            body: content.to_string(),
        };
    };

    let mut fields = BTreeMap::new();
    if let Some(header) = captures.get(1) {
        for line in header.as_str().lines() {
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                fields.insert(key.to_string(), value.trim().to_string());
            }
        }
    }

    let end = captures.get(0).map_or(0, |m| m.end());
    Frontmatter {
        fields,
        body: content[end..].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = "---\ndescription: Review a file\nargument-hint: [file] [depth]\n---\nReview {{file}}.\n";
        let parsed = parse_frontmatter(content);
        assert_eq!(parsed.get("description"), Some("Review a file"));
        assert_eq!(parsed.get("argument-hint"), Some("[file] [depth]"));
        assert_eq!(parsed.body, "Review {{file}}.\n");
    }

    #[test]
    fn test_parse_frontmatter_without_frontmatter() {
        let content = "# Just markdown\n\nNo header here.";
        let parsed = parse_frontmatter(content);
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_parse_frontmatter_unclosed_header_is_body() {
        let content = "---\ndescription: never closed\nbody text";
        let parsed = parse_frontmatter(content);
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_parse_frontmatter_roundtrip() {
        let mut header = BTreeMap::new();
        header.insert("description".to_string(), "Summarize changes".to_string());
        header.insert("argument-hint".to_string(), "[branch]".to_string());
        header.insert("model".to_string(), "fast".to_string());
        let body = "\n  Indented first line\n\nSummarize {{branch}}.\n";

        let mut text = String::from("---\n");
        for (key, value) in &header {
            text.push_str(&format!("{}: {}\n", key, value));
        }
        text.push_str("---\n");
        text.push_str(body);

        let parsed = parse_frontmatter(&text);
        assert_eq!(parsed.fields, header);
        assert_eq!(parsed.body, body);
    }

    #[test]
    fn test_parse_frontmatter_splits_at_first_colon() {
        let parsed = parse_frontmatter("---\nurl: https://example.com:8080\n---\n");
        assert_eq!(parsed.get("url"), Some("https://example.com:8080"));
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_parse_frontmatter_ignores_lines_without_colon() {
        let parsed = parse_frontmatter("---\njust words\n: no key\nkey:  spaced value  \n---\nbody");
        assert_eq!(parsed.fields.len(), 1);
        assert_eq!(parsed.get("key"), Some("spaced value"));
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn test_parse_frontmatter_empty_header() {
        let parsed = parse_frontmatter("---\n---\nbody\n---\nmore");
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.body, "body\n---\nmore");
    }

    #[test]
    fn test_parse_frontmatter_crlf() {
        let parsed = parse_frontmatter("---\r\ndescription: windows\r\n---\r\nbody\r\n");
        assert_eq!(parsed.get("description"), Some("windows"));
        assert_eq!(parsed.body, "body\r\n");
    }

    #[test]
    fn test_parse_frontmatter_delimiter_at_end_of_input() {
        let parsed = parse_frontmatter("---\ndescription: only header\n---");
        assert_eq!(parsed.get("description"), Some("only header"));
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn test_parse_frontmatter_requires_leading_delimiter() {
        let content = "\n---\ndescription: late\n---\nbody";
        let parsed = parse_frontmatter(content);
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.body, content);
    }
}
