//! Prompt templates with `{variable}` placeholders.

use serde_json::{Map, Value};
use std::fmt;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Variable(String),
}

/// A parsed prompt template.
///
/// Placeholders are written `{name}`; `{{` and `}}` produce literal braces.
///
/// # Example
///
/// ```rust
/// use agent_workflow::PromptTemplate;
/// use serde_json::json;
///
/// let prompt = PromptTemplate::new("Summarize {text} in {words} words. {{json}}").unwrap();
/// assert_eq!(prompt.variables(), ["text", "words"]);
///
/// let values = json!({"text": "the article", "words": 50}).as_object().cloned().unwrap();
/// assert_eq!(
///     prompt.format(&values).unwrap(),
///     "Summarize the article in 50 words. {json}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Parse a template.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let source = template.into();
        let segments = parse(&source)?;

        let mut variables: Vec<String> = Vec::new();
        for segment in &segments {
            if let Segment::Variable(name) = segment {
                if !variables.contains(name) {
                    variables.push(name.clone());
                }
            }
        }

        Ok(Self {
            source,
            segments,
            variables,
        })
    }

    /// The distinct placeholder names, in order of first appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Substitute every placeholder from `values`.
    ///
    /// Strings are inserted verbatim; other values are rendered as JSON.
    pub fn format(&self, values: &Map<String, Value>) -> Result<String> {
        let mut rendered = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Variable(name) => match values.get(name) {
                    Some(Value::String(s)) => rendered.push_str(s),
                    Some(other) => rendered.push_str(&other.to_string()),
                    None => {
                        return Err(Error::Prompt(format!("no value for variable '{name}'")));
                    }
                },
            }
        }
        Ok(rendered)
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                text.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                text.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(Error::Prompt(format!(
                                "unclosed placeholder in template: {template:?}"
                            )));
                        }
                        Some(ch) => name.push(ch),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::Prompt("empty placeholder in template".to_string()));
                }
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => {
                return Err(Error::Prompt(format!(
                    "unmatched '}}' in template: {template:?}"
                )));
            }
            other => text.push(other),
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variables_are_distinct_and_ordered() {
        let prompt = PromptTemplate::new("{b} {a} {b}").unwrap();
        assert_eq!(prompt.variables(), ["b", "a"]);
    }

    #[test]
    fn test_null_renders_as_json() {
        let prompt = PromptTemplate::new("value: {x}").unwrap();
        let values = json!({"x": null}).as_object().cloned().unwrap();
        assert_eq!(prompt.format(&values).unwrap(), "value: null");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let prompt = PromptTemplate::new("{x}").unwrap();
        assert!(matches!(prompt.format(&Map::new()), Err(Error::Prompt(_))));
    }

    #[test]
    fn test_malformed_templates() {
        assert!(PromptTemplate::new("{open").is_err());
        assert!(PromptTemplate::new("close}").is_err());
        assert!(PromptTemplate::new("{}").is_err());
        assert!(PromptTemplate::new("no placeholders").unwrap().variables().is_empty());
    }
}
