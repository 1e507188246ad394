//! Argument-hint parsing.
//!
//! An argument hint such as `[file] [depth]` declares a command's positional
//! parameters. Each bracketed token becomes one `string` parameter, in order.
//!
//! Requiredness is positional: the first token is required and every later
//! token is optional. A single hint string cannot express anything richer,
//! so two explicit markers are accepted on top of the heuristic:
//!
//! - `[name?]` declares an optional parameter, even in first position.
//! - `[name=value]` declares an optional parameter with default `value`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::types::{CommandParameter, ParameterType};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("argument hint regex is valid"));

/// Parse an optional argument hint into parameter declarations.
///
/// Returns `None` when no hint was given. A hint without any bracketed
/// token yields `Some` of an empty list, i.e. zero declared parameters.
pub fn parse_argument_hint(hint: Option<&str>) -> Option<Vec<CommandParameter>> {
    let hint = hint?;
    let mut params: Vec<CommandParameter> = Vec::new();

    for captures in TOKEN_RE.captures_iter(hint) {
        let token = captures.get(1).map_or("", |m| m.as_str()).trim();
        if token.is_empty() {
            continue;
        }

        let position = params.len();
        let (name, required, default) = if let Some((name, value)) = token.split_once('=') {
            (name.trim(), false, Some(Value::String(value.trim().to_string())))
        } else if let Some(name) = token.strip_suffix('?') {
            (name.trim(), false, None)
        } else {
            (token, position == 0, None)
        };

        if name.is_empty() {
            continue;
        }

        params.push(CommandParameter {
            name: name.to_string(),
            param_type: ParameterType::String,
            description: format!("Positional argument {} ({})", position + 1, name),
            required,
            default,
        });
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &[CommandParameter]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_parse_hint_two_tokens() {
        let params = parse_argument_hint(Some("[file] [depth]")).unwrap();
        assert_eq!(names(&params), vec!["file", "depth"]);
        assert!(params[0].required);
        assert!(!params[1].required);
        assert!(params.iter().all(|p| p.param_type == ParameterType::String));
        assert_eq!(params[0].description, "Positional argument 1 (file)");
    }

    #[test]
    fn test_parse_hint_absent() {
        assert!(parse_argument_hint(None).is_none());
    }

    #[test]
    fn test_parse_hint_without_tokens_is_empty_list() {
        assert_eq!(parse_argument_hint(Some("")), Some(vec![]));
        assert_eq!(parse_argument_hint(Some("<file>")), Some(vec![]));
    }

    #[test]
    fn test_parse_hint_optional_marker() {
        let params = parse_argument_hint(Some("[scope?] [target]")).unwrap();
        assert_eq!(names(&params), vec!["scope", "target"]);
        assert!(!params[0].required);
        assert!(!params[1].required);
    }

    #[test]
    fn test_parse_hint_default_marker() {
        let params = parse_argument_hint(Some("[branch] [remote=origin]")).unwrap();
        assert_eq!(names(&params), vec!["branch", "remote"]);
        assert!(params[0].required);
        assert!(!params[1].required);
        assert_eq!(params[1].default_text().as_deref(), Some("origin"));
    }

    #[test]
    fn test_parse_hint_skips_empty_tokens_and_trims() {
        let params = parse_argument_hint(Some("[] [  file  ] text [ ] [mode]")).unwrap();
        assert_eq!(names(&params), vec!["file", "mode"]);
        assert!(params[0].required);
        assert_eq!(params[1].description, "Positional argument 2 (mode)");
    }

    #[test]
    fn test_parse_hint_preserves_input_order() {
        let params = parse_argument_hint(Some("[c] [a] [b]")).unwrap();
        assert_eq!(names(&params), vec!["c", "a", "b"]);
    }
}
