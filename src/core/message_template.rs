//! Message template parsing
//!
//! A template is literal text with named holes: `"User {Name} logged in"`.
//! `{{` and `}}` stand for literal braces and a hole may carry a format
//! after a colon (`{Timestamp:%H:%M}`). The same tokenizer backs per-call
//! message templates (lenient: malformed holes stay literal text) and sink
//! output templates (strict: malformed holes are errors).

use super::property::{Properties, PropertyValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    Text(String),
    Hole { name: String, format: Option<String> },
}

impl TemplateToken {
    fn hole_source(name: &str, format: Option<&str>) -> String {
        match format {
            Some(format) => format!("{{{}:{}}}", name, format),
            None => format!("{{{}}}", name),
        }
    }
}

/// Split `text` into literal and hole tokens.
///
/// With `strict` set, syntax problems are returned as an error message;
/// otherwise the offending characters are kept as literal text.
pub(crate) fn tokenize(text: &str, strict: bool) -> std::result::Result<Vec<TemplateToken>, String> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            literal.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            literal.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            if strict {
                return Err(format!("unmatched '}}' at offset {}", text.len() - tail.len()));
            }
            literal.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(close) = tail.find('}') else {
            if strict {
                return Err(format!("unclosed '{{' at offset {}", text.len() - tail.len()));
            }
            literal.push_str(tail);
            rest = "";
            break;
        };

        let content = &tail[1..close];
        let (name, format) = match content.split_once(':') {
            Some((name, format)) => (name, Some(format)),
            None => (content, None),
        };

        if is_valid_name(name) && format.map_or(true, |f| !f.is_empty()) {
            if !literal.is_empty() {
                tokens.push(TemplateToken::Text(std::mem::take(&mut literal)));
            }
            tokens.push(TemplateToken::Hole {
                name: name.to_string(),
                format: format.map(str::to_string),
            });
        } else if strict {
            return Err(format!("invalid placeholder '{{{}}}'", content));
        } else {
            literal.push_str(&tail[..=close]);
        }
        rest = &tail[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(TemplateToken::Text(literal));
    }
    Ok(tokens)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A parsed per-call message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    text: String,
    tokens: Vec<TemplateToken>,
}

impl MessageTemplate {
    /// Parse a message template. Never fails: malformed holes render literally.
    pub fn parse(text: &str) -> Self {
        let tokens = tokenize(text, false).unwrap_or_else(|_| vec![TemplateToken::Text(text.to_string())]);
        Self {
            text: text.to_string(),
            tokens,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Names of the holes, in order of first appearance
    pub fn hole_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for token in &self.tokens {
            if let TemplateToken::Hole { name, .. } = token {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Bind positional arguments to the template's holes.
    ///
    /// When every hole is numeric (`{0}`, `{1}`), a hole binds the argument
    /// at that index. Otherwise distinct names bind to arguments in order of
    /// first appearance. Holes without an argument stay unbound; surplus
    /// arguments are ignored.
    pub fn bind(&self, args: &[PropertyValue]) -> Properties {
        let names = self.hole_names();
        let mut properties = Properties::with_capacity(names.len().min(args.len()));
        let positional = !names.is_empty() && names.iter().all(|n| n.chars().all(|c| c.is_ascii_digit()));

        if positional {
            for name in names {
                if let Some(value) = name.parse::<usize>().ok().and_then(|idx| args.get(idx)) {
                    properties.insert(name, value.clone());
                }
            }
        } else {
            for (name, value) in names.into_iter().zip(args) {
                properties.insert(name, value.clone());
            }
        }
        properties
    }

    /// Render with values taken from `properties`; unbound holes are kept verbatim.
    pub fn render(&self, properties: &Properties) -> String {
        let mut out = String::with_capacity(self.text.len());
        for token in &self.tokens {
            match token {
                TemplateToken::Text(text) => out.push_str(text),
                TemplateToken::Hole { name, format } => match properties.get(name) {
                    Some(value) if format.as_deref() == Some("j") => {
                        out.push_str(&value.to_json_value().to_string());
                    }
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push_str(&TemplateToken::hole_source(name, format.as_deref())),
                },
            }
        }
        out
    }
}
