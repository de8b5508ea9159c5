//! Template error types

use std::fmt;
use std::path::PathBuf;

/// Template assignment and rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template source missing and no usable cache entry
    SourceNotFound {
        /// Template name as requested by the caller
        template: String,
        /// Resolved path that was looked up
        path: PathBuf,
    },

    /// Template name is absolute or climbs out of the template directory
    TemplatePathEscape {
        /// Template name as requested by the caller
        template: String,
    },

    /// `{include file='...'}` references a file that cannot be read
    IncludeNotFound {
        /// The file attribute of the include directive
        file: String,
        /// Resolved path that was looked up
        path: PathBuf,
        /// Line number of the directive
        line: usize,
    },

    /// Include path is absolute or climbs out of its root
    IncludePathEscape {
        /// The file attribute of the include directive
        file: String,
    },

    /// Include expansion nested too deeply (usually an include cycle)
    IncludeDepthExceeded {
        /// Include being expanded when the limit was hit
        file: String,
        /// Maximum nesting depth
        max_depth: usize,
    },

    /// Variable name is empty or contains non-identifier characters
    InvalidName {
        /// The rejected name, decorations included
        name: String,
    },

    /// Append/prepend on a binding (or with a value) that is not a scalar
    NotAScalar {
        /// Binding name without `++` decoration
        name: String,
    },

    /// Dotted assignment walks through an existing scalar
    PathConflict {
        /// Full dotted name being assigned
        name: String,
        /// The segment that holds a scalar
        segment: String,
    },

    /// Failed to read a template source
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::SourceNotFound { template, path } => {
                write!(
                    f,
                    "Template '{}' not found at {} and no cache entry is available",
                    template,
                    path.display()
                )
            }
            TemplateError::TemplatePathEscape { template } => {
                write!(
                    f,
                    "Template name '{}' must be relative and stay inside the template directory",
                    template
                )
            }
            TemplateError::IncludeNotFound { file, path, line } => {
                write!(
                    f,
                    "Included file '{}' not found at {} (line {})",
                    file,
                    path.display(),
                    line
                )
            }
            TemplateError::IncludePathEscape { file } => {
                write!(
                    f,
                    "Include path '{}' must be relative and stay inside its root",
                    file
                )
            }
            TemplateError::IncludeDepthExceeded { file, max_depth } => {
                write!(
                    f,
                    "Include nesting exceeded {} levels while expanding '{}'. Check for {{include}} cycles.",
                    max_depth, file
                )
            }
            TemplateError::InvalidName { name } => {
                write!(
                    f,
                    "Invalid variable name '{}'. Use identifier characters and '.' separators",
                    name
                )
            }
            TemplateError::NotAScalar { name } => {
                write!(
                    f,
                    "Cannot append or prepend to '{}': both sides must be plain strings",
                    name
                )
            }
            TemplateError::PathConflict { name, segment } => {
                write!(
                    f,
                    "Cannot assign '{}': '{}' is already bound to a string",
                    name, segment
                )
            }
            TemplateError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}
