// ============================================================================
// domain/error.rs - MODEL, EVALUATION AND RENDER ERRORS
// ============================================================================

use thiserror::Error;

/// Model validation errors.
///
/// All errors are:
/// - Cloneable (they travel through the service layer by value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid {kind} identifier '{name}'")]
    InvalidIdentifier { kind: &'static str, name: String },

    #[error("Duplicate task '{name}' in component '{component}'")]
    DuplicateTask { component: String, name: String },

    #[error("Duplicate operation '{name}' in task '{task}'")]
    DuplicateOperation { task: String, name: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Duplicate output path: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Skeleton '{name}' does not parse: {source}")]
    InvalidSkeleton {
        name: String,
        #[source]
        source: RenderError,
    },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("Component '{component}' has no task named '{name}'")]
    UnknownTask { component: String, name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidIdentifier { kind, name } => vec![
                format!("'{}' is not a valid C++ {} name", name, kind),
                "Identifiers start with a letter or '_' followed by letters, digits or '_'".into(),
            ],
            Self::DuplicateTask { name, .. } => vec![
                format!("Task '{}' is declared more than once", name),
                "Rename or remove one of the declarations".into(),
            ],
            Self::DuplicateOperation { task, name } => vec![
                format!("Operation '{}' is declared twice in '{}'", name, task),
                "Overloaded operations are not supported".into(),
            ],
            Self::UnknownTask { component, .. } => vec![format!(
                "Try: skelgen list <project> to see the tasks of '{}'",
                component
            )],
            Self::DuplicatePath { path } => vec![
                format!("Two skeletons render to '{}'", path),
                "Make the output path templates of your skeletons distinct".into(),
            ],
            Self::InvalidSkeleton { source, .. } => source.suggestions(),
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTask { .. } => ErrorCategory::NotFound,
            Self::InvalidSkeleton { .. } => ErrorCategory::Template,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Template,
    NotFound,
}

// ============================================================================
// Expression evaluation
// ============================================================================

/// Failure while resolving an expression against a scope.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    /// A binding or attribute does not exist on the current value's type.
    #[error("unresolved path '{path}': no '{segment}' on {on}")]
    UnresolvedPath {
        path: String,
        segment: String,
        on: &'static str,
    },

    /// A value has the wrong shape for the construct using it.
    #[error("type mismatch in '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl EvalError {
    /// The expression text the error was raised for.
    pub fn path(&self) -> &str {
        match self {
            Self::UnresolvedPath { path, .. } | Self::TypeMismatch { path, .. } => path,
        }
    }
}

// ============================================================================
// Template syntax
// ============================================================================

/// Template text that cannot be parsed into chunks.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("tag opened here is never closed with '%>'")]
    UnterminatedTag,

    #[error("'{keyword}' block is never closed with 'end'")]
    UnclosedBlock { keyword: &'static str },

    #[error("unexpected '{keyword}'")]
    UnexpectedKeyword { keyword: String },

    #[error("unknown statement '{statement}'")]
    UnknownStatement { statement: String },

    #[error("invalid expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },
}

/// What went wrong in a failed render.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderErrorKind {
    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// The single error surfaced by template parsing and rendering.
///
/// Carries the 1-based template line of the offending tag.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("template line {line}: {kind}")]
pub struct RenderError {
    pub line: usize,
    #[source]
    pub kind: RenderErrorKind,
}

impl RenderError {
    pub fn new(line: usize, kind: impl Into<RenderErrorKind>) -> Self {
        Self {
            line,
            kind: kind.into(),
        }
    }

    /// The offending expression path, for evaluation failures.
    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            RenderErrorKind::Eval(e) => Some(e.path()),
            RenderErrorKind::Syntax(_) => None,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, RenderErrorKind::Syntax(_))
    }

    pub fn suggestions(&self) -> Vec<String> {
        match &self.kind {
            RenderErrorKind::Eval(EvalError::UnresolvedPath { segment, on, .. }) => vec![
                format!("Check the spelling of '{}' at template line {}", segment, self.line),
                format!("See the accessor table for {} values", on),
            ],
            RenderErrorKind::Eval(EvalError::TypeMismatch { expected, .. }) => vec![format!(
                "The expression at template line {} must evaluate to {}",
                self.line, expected
            )],
            RenderErrorKind::Syntax(_) => vec![
                format!("Fix the template syntax near line {}", self.line),
                "Blocks are written <% if x %> ... <% end %> or <% each v in xs %> ... <% end %>"
                    .into(),
            ],
        }
    }
}
