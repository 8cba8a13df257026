use super::DomainError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A filesystem path guaranteed to be relative.
///
/// Invariant: Never absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute() || path.as_os_str().is_empty() {
            Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            })
        } else {
            Ok(Self(path))
        }
    }

    /// Prefix with a relative directory, maintaining the relative invariant.
    pub fn under(&self, dir: impl AsRef<Path>) -> Self {
        Self(dir.as_ref().join(&self.0))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// `true` when `name` is a valid C++ identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Validate an identifier, naming what it identifies on failure.
pub(crate) fn check_identifier(kind: &'static str, name: &str) -> Result<(), DomainError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DomainError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("Controller"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("get2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("nav::Controller"));
        assert!(!is_identifier("with space"));
    }

    #[test]
    fn relative_path_rejects_absolute() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("").is_err());
        assert!(RelativePath::try_new("tasks/Controller.cpp").is_ok());
    }

    #[test]
    fn relative_path_under_dir() {
        let path = RelativePath::try_new("tasks/Controller.cpp").unwrap();
        assert_eq!(
            path.under("templates").as_path(),
            Path::new("templates/tasks/Controller.cpp")
        );
    }
}
