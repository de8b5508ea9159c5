//! `{include}` resolution and expansion

use super::tokenize::{TokenKind, TokenStream};
use crate::template::error::TemplateError;
use std::path::{Component, Path, PathBuf};

/// Maximum include nesting (a cycle hits this instead of looping forever)
pub(crate) const MAX_INCLUDE_DEPTH: usize = 32;

/// Join `name` onto `root` if it stays inside it
///
/// `name` must be relative and no `..` may climb above `root`.
pub(crate) fn resolve_relative(root: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    if name.is_empty() || relative.is_absolute() {
        return None;
    }

    let mut depth = 0usize;
    for component in relative.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => depth = depth.checked_sub(1)?,
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(root.join(relative))
}

/// Resolve an include reference against `root`
pub(crate) fn resolve_include(root: &Path, file: &str) -> Result<PathBuf, TemplateError> {
    resolve_relative(root, file).ok_or_else(|| TemplateError::IncludePathEscape {
        file: file.to_string(),
    })
}

/// Replace every `{include}` in `text` with the raw contents of its file
///
/// Runs until no include directive remains, so included files may include
/// further files. Every file read is appended to `sources` once.
pub(crate) fn expand_includes(
    text: String,
    root: &Path,
    sources: &mut Vec<PathBuf>,
) -> Result<String, TemplateError> {
    let mut text = text;
    let mut depth = 0;

    loop {
        let includes: Vec<_> = TokenStream::new(&text)
            .filter_map(|token| match &token.kind {
                TokenKind::Include { file } => Some((file.clone(), token.clone())),
                _ => None,
            })
            .collect();

        let Some((first_file, _)) = includes.first() else {
            return Ok(text);
        };

        if depth == MAX_INCLUDE_DEPTH {
            return Err(TemplateError::IncludeDepthExceeded {
                file: first_file.clone(),
                max_depth: MAX_INCLUDE_DEPTH,
            });
        }

        let mut expanded = String::with_capacity(text.len());
        let mut cursor = 0;
        for (file, token) in &includes {
            let path = resolve_include(root, file)?;
            let contents =
                std::fs::read_to_string(&path).map_err(|_| TemplateError::IncludeNotFound {
                    file: file.clone(),
                    path: path.clone(),
                    line: token.line,
                })?;
            log::debug!("include '{}' -> {}", file, path.display());

            expanded.push_str(&text[cursor..token.start]);
            expanded.push_str(&contents);
            cursor = token.end();

            if !sources.contains(&path) {
                sources.push(path);
            }
        }
        expanded.push_str(&text[cursor..]);

        text = expanded;
        depth += 1;
    }
}
