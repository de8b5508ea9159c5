//! Template engine implementation

mod blocks;
mod include;
mod tokenize;

use crate::template::binding::{Bindings, Lookup};
use crate::template::error::TemplateError;
use std::path::PathBuf;

use blocks::find_capture_end;
use include::expand_includes;
pub(crate) use include::resolve_relative;
use tokenize::{TokenKind, TokenStream};

/// Result of running the pipeline over one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Final output text
    pub output: String,
    /// Every file pulled in through `{include}`, in first-seen order
    pub sources: Vec<PathBuf>,
}

/// Template engine: include expansion plus variable substitution
///
/// Rendering runs two passes. Each pass expands includes until none remain
/// and then substitutes placeholders and directives. The first pass resolves
/// includes against the include root, the second against the template
/// directory, so includes introduced by substituted values are still
/// expanded.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    include_root: PathBuf,
    template_dir: PathBuf,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new(include_root: impl Into<PathBuf>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            include_root: include_root.into(),
            template_dir: template_dir.into(),
        }
    }

    /// Render template text against `bindings`
    ///
    /// `{set}` and `{capture}` write into a render-local copy; the caller's
    /// bindings are never modified.
    pub fn render(&self, template: &str, bindings: &Bindings) -> Result<Expansion, TemplateError> {
        let mut scope = bindings.clone();
        let mut sources = Vec::new();
        let mut text = template.to_string();

        for (pass, root) in [&self.include_root, &self.template_dir].into_iter().enumerate() {
            text = expand_includes(text, root, &mut sources)?;
            text = substitute(&text, &mut scope);
            log::debug!(
                "pass {} done: {} bytes, {} include(s) so far",
                pass + 1,
                text.len(),
                sources.len()
            );
        }

        Ok(Expansion {
            output: text,
            sources,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(".", ".")
    }
}

/// Substitute placeholders and apply directives in one scan
///
/// Bound scalars replace their placeholder; mapping-valued and unbound
/// placeholders are removed. Comments are stripped, `{set}` binds, and a
/// `{capture}` body is rendered into its variable instead of the output.
/// Unmatched capture tags and leftover includes stay as raw text.
fn substitute(text: &str, scope: &mut Bindings) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for token in TokenStream::new(text) {
        // Tokens inside a capture body that was already consumed
        if token.start < cursor {
            continue;
        }

        output.push_str(&text[cursor..token.start]);
        cursor = token.end();

        match &token.kind {
            TokenKind::Placeholder { path } => {
                if let Lookup::Scalar(value) = scope.lookup(path) {
                    output.push_str(value);
                }
            }
            TokenKind::Comment => {}
            TokenKind::Set { var, value } => {
                if let Err(e) = scope.assign(var, value.as_str()) {
                    log::warn!("line {}: ignoring {}: {}", token.line, token.raw(text), e);
                    output.push_str(token.raw(text));
                }
            }
            TokenKind::CaptureStart { name } => match find_capture_end(&text[cursor..]) {
                Some((body_len, end_len)) => {
                    let body = &text[cursor..cursor + body_len];
                    let captured = substitute(body, scope);
                    if let Err(e) = scope.assign(name, captured) {
                        log::warn!("line {}: capture discarded: {}", token.line, e);
                    }
                    cursor += body_len + end_len;
                }
                None => {
                    log::debug!("line {}: unclosed {}", token.line, token.raw(text));
                    output.push_str(token.raw(text));
                }
            },
            TokenKind::CaptureEnd | TokenKind::Include { .. } => {
                output.push_str(token.raw(text));
            }
        }
    }

    output.push_str(&text[cursor..]);
    output
}

/// Convenience function to render template text with includes resolved
/// against the current directory
pub fn render(template: &str, bindings: &Bindings) -> Result<String, TemplateError> {
    TemplateEngine::default()
        .render(template, bindings)
        .map(|expansion| expansion.output)
}

#[cfg(test)]
mod tests;
