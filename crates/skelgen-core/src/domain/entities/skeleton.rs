use crate::domain::{error::DomainError, template::Template};

/// A file generated once per task: an output-path template plus a body
/// template, both rendered against the same task scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    name: String,
    path_source: String,
    path: Template,
    body: Template,
}

impl Skeleton {
    /// Parse both templates. A syntax error in either is reported against
    /// the skeleton's name.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        body: &str,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "skeleton name",
            });
        }
        let path_source = path.into();

        let parse = |source: &str| {
            Template::parse(source).map_err(|source| DomainError::InvalidSkeleton {
                name: name.clone(),
                source,
            })
        };
        let path = parse(&path_source)?;
        let body = parse(body)?;

        Ok(Self {
            name,
            path_source,
            path,
            body,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unrendered output-path template, e.g. `tasks/<%= task.basename %>.cpp`.
    pub fn path_source(&self) -> &str {
        &self.path_source
    }

    pub fn path_template(&self) -> &Template {
        &self.path
    }

    pub fn body_template(&self) -> &Template {
        &self.body
    }
}
