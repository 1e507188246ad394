//! Positional `{{parameter}}` substitution for command prompts.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use super::types::CommandParameter;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder regex is valid"));

/// Substitute positional arguments into a prompt.
///
/// For the parameter at index `i`, every `{{name}}` occurrence becomes
/// `args[i]` when supplied, else the declared default, else the empty
/// string. Placeholders that match no declared parameter are left as-is and
/// surplus arguments are ignored.
///
/// Substitution is a single pass over `prompt`: placeholder text inside a
/// substituted value is kept literally.
pub fn render_prompt(prompt: &str, params: &[CommandParameter], args: &[String]) -> String {
    let mut values: HashMap<&str, String> = HashMap::with_capacity(params.len());

    for (index, param) in params.iter().enumerate() {
        if values.contains_key(param.name.as_str()) {
            continue;
        }
        let value = match args.get(index) {
            Some(arg) => arg.clone(),
            None => {
                if param.required && param.default.is_none() {
                    debug!(parameter = %param.name, "Required argument missing, substituting empty");
                }
                param.default_text().unwrap_or_default()
            }
        };
        values.insert(param.name.as_str(), value);
    }

    if args.len() > params.len() {
        debug!(
            supplied = args.len(),
            declared = params.len(),
            "Ignoring surplus arguments"
        );
    }

    PLACEHOLDER_RE
        .replace_all(prompt, |caps: &Captures<'_>| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::types::ParameterType;
    use serde_json::json;

    fn param(name: &str, default: Option<serde_json::Value>) -> CommandParameter {
        CommandParameter {
            name: name.to_string(),
            param_type: ParameterType::String,
            description: String::new(),
            required: false,
            default,
        }
    }

    #[test]
    fn test_render_uses_default() {
        let params = vec![param("name", Some(json!("friend")))];
        assert_eq!(render_prompt("Hi {{name}}", &params, &[]), "Hi friend");
    }

    #[test]
    fn test_render_prefers_argument_over_default() {
        let params = vec![param("name", Some(json!("friend")))];
        let args = vec!["Ada".to_string()];
        assert_eq!(render_prompt("Hi {{name}}", &params, &args), "Hi Ada");
    }

    #[test]
    fn test_render_missing_argument_without_default_is_empty() {
        let params = vec![param("a", None), param("b", None)];
        let args = vec!["1".to_string()];
        assert_eq!(render_prompt("[{{a}}|{{b}}]", &params, &args), "[1|]");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let params = vec![param("x", None)];
        let args = vec!["7".to_string()];
        assert_eq!(render_prompt("{{x}} + {{x}} = 2*{{x}}", &params, &args), "7 + 7 = 2*7");
    }

    #[test]
    fn test_render_leaves_undeclared_placeholders() {
        let params = vec![param("x", None)];
        let args = vec!["1".to_string(), "surplus".to_string()];
        assert_eq!(render_prompt("{{x}} {{y}}", &params, &args), "1 {{y}}");
    }

    #[test]
    fn test_render_non_string_default() {
        let params = vec![param("depth", Some(json!(2)))];
        assert_eq!(render_prompt("depth={{depth}}", &params, &[]), "depth=2");
    }

    #[test]
    fn test_render_without_parameters_returns_prompt() {
        assert_eq!(render_prompt("static {{text}}", &[], &[]), "static {{text}}");
    }

    #[test]
    fn test_render_keeps_placeholders_inside_arguments() {
        let params = vec![param("file", None), param("depth", None)];
        let args = vec!["{{depth}}".to_string(), "3".to_string()];
        assert_eq!(
            render_prompt("Review {{file}} (depth {{depth}})", &params, &args),
            "Review {{depth}} (depth 3)"
        );
    }

    #[test]
    fn test_render_keeps_placeholders_inside_defaults() {
        let params = vec![param("a", Some(json!("{{b}}"))), param("b", None)];
        let args: Vec<String> = Vec::new();
        assert_eq!(render_prompt("{{a}}|{{b}}", &params, &args), "{{b}}|");
    }
}
