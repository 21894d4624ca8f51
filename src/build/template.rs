//! Dockerfile template rendering
//!
//! Supports the subset of Go template syntax used by `Dockerfile.tmpl`:
//!
//! ```text
//! FROM eclipse-temurin:11-jre
//! ENV CROWD_VERSION {{ .Version }}
//! ADD {{ .ZipURL }} /opt/crowd.tar.gz
//! {{ if .Latest }}LABEL latest=true{{ else }}LABEL latest=false{{ end }}
//! ```
//!
//! Conditionals cannot be nested.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::feed::types::{Package, RELEASE_DATE_FORMAT};
use crate::feed::version_key::major_minor;

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{\s*(.*?)\s*\}\}").expect("action pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown field: .{0}")]
    UnknownField(String),

    #[error("field .{0} is not a boolean")]
    NotBoolean(String),

    #[error("unsupported action: {{{{ {0} }}}}")]
    UnsupportedAction(String),

    #[error("nested {{{{ if }}}} blocks are not supported")]
    NestedBlock,

    #[error("{{{{ {0} }}}} without matching {{{{ if }}}}")]
    Unmatched(&'static str),

    #[error("{{{{ if }}}} block is never closed")]
    Unclosed,

    #[error("{{{{ is never closed")]
    Unterminated,
}

/// Package value that can be referenced from a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ZipUrl,
    Version,
    Released,
    Latest,
    MajorMinor,
}

impl Field {
    fn parse(expr: &str) -> Result<Self, TemplateError> {
        let name = expr
            .strip_prefix('.')
            .ok_or_else(|| TemplateError::UnsupportedAction(expr.to_string()))?;
        match name {
            "ZipURL" => Ok(Field::ZipUrl),
            "Version" => Ok(Field::Version),
            "Released" => Ok(Field::Released),
            "Latest" => Ok(Field::Latest),
            "MajorMinor" => Ok(Field::MajorMinor),
            _ => Err(TemplateError::UnknownField(name.to_string())),
        }
    }

    fn value(self, package: &Package) -> String {
        match self {
            Field::ZipUrl => package.archive_url.clone(),
            Field::Version => package.version.clone(),
            Field::Released => package.released.format(RELEASE_DATE_FORMAT).to_string(),
            Field::Latest => package.is_primary.to_string(),
            Field::MajorMinor => major_minor(&package.version),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Field(Field),
    Latest {
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// Open `{{ if }}` block while parsing
struct Block {
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

impl Block {
    fn current(&mut self) -> &mut Vec<Node> {
        self.otherwise.as_mut().unwrap_or(&mut self.then)
    }
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let mut nodes = Vec::new();
        let mut block: Option<Block> = None;
        let mut last = 0;

        for captures in ACTION.captures_iter(text) {
            let (Some(whole), Some(action)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_text(
                target_of(&mut nodes, &mut block),
                &text[last..whole.start()],
            )?;
            last = whole.end();

            let action = action.as_str();
            let mut words = action.split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some("if"), Some(expr), None) => {
                    if block.is_some() {
                        return Err(TemplateError::NestedBlock);
                    }
                    if Field::parse(expr)? != Field::Latest {
                        let name = expr.trim_start_matches('.').to_string();
                        return Err(TemplateError::NotBoolean(name));
                    }
                    block = Some(Block {
                        then: Vec::new(),
                        otherwise: None,
                    });
                }
                (Some("else"), None, None) => match block.as_mut() {
                    Some(open) if open.otherwise.is_none() => open.otherwise = Some(Vec::new()),
                    _ => return Err(TemplateError::Unmatched("else")),
                },
                (Some("end"), None, None) => {
                    let open = block.take().ok_or(TemplateError::Unmatched("end"))?;
                    nodes.push(Node::Latest {
                        then: open.then,
                        otherwise: open.otherwise.unwrap_or_default(),
                    });
                }
                (Some(expr), None, None) => {
                    let field = Field::parse(expr)?;
                    target_of(&mut nodes, &mut block).push(Node::Field(field));
                }
                _ => return Err(TemplateError::UnsupportedAction(action.to_string())),
            }
        }

        if block.is_some() {
            return Err(TemplateError::Unclosed);
        }
        push_text(&mut nodes, &text[last..])?;

        Ok(Self { nodes })
    }

    /// Render the template with the values of `package`
    pub fn render(&self, package: &Package) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, package, &mut out);
        out
    }
}

fn target_of<'a>(nodes: &'a mut Vec<Node>, block: &'a mut Option<Block>) -> &'a mut Vec<Node> {
    match block {
        Some(open) => open.current(),
        None => nodes,
    }
}

fn push_text(target: &mut Vec<Node>, text: &str) -> Result<(), TemplateError> {
    if text.contains("{{") {
        return Err(TemplateError::Unterminated);
    }
    if !text.is_empty() {
        target.push(Node::Text(text.to_string()));
    }
    Ok(())
}

fn render_nodes(nodes: &[Node], package: &Package, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(field) => out.push_str(&field.value(package)),
            Node::Latest { then, otherwise } => {
                let branch = if package.is_primary { then } else { otherwise };
                render_nodes(branch, package, out);
            }
        }
    }
}
