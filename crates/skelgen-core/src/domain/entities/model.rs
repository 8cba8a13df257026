//! The component model skeletons are generated from.
//!
//! ```text
//! Component ── owns ──▶ Task ── owns ──▶ Operation ──▶ Argument
//!                                          └──────────▶ TypeRef (return types)
//! ```
//!
//! The model is built once per generation run (usually by a `ProjectLoader`
//! adapter), then only read. Tasks do not store a pointer back to their
//! component; the renderer pairs them explicitly through `TaskRef`.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::domain::{entities::common::check_identifier, error::DomainError};

/// Separator between a component name and a task basename.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// A component: a named namespace owning a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    name: String,
    tasks: Vec<Task>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Find a task by basename or by its qualified `component::basename` name.
    pub fn task(&self, name: &str) -> Result<&Task, DomainError> {
        let basename = name
            .strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix(NAMESPACE_SEPARATOR))
            .unwrap_or(name);

        self.tasks
            .iter()
            .find(|t| t.basename == basename)
            .ok_or_else(|| DomainError::UnknownTask {
                component: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Check identifiers and uniqueness across the whole model.
    pub fn validate(&self) -> Result<(), DomainError> {
        check_identifier("component", &self.name)?;

        let mut seen = HashSet::new();
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.basename.as_str()) {
                return Err(DomainError::DuplicateTask {
                    component: self.name.clone(),
                    name: task.basename.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A task: one generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    basename: String,
    fixed_initial_state: bool,
    self_operations: Vec<Operation>,
}

impl Task {
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            fixed_initial_state: false,
            self_operations: Vec::new(),
        }
    }

    /// When set, the generated constructor takes no initial-state parameter.
    pub fn fixed_initial_state(mut self, fixed: bool) -> Self {
        self.fixed_initial_state = fixed;
        self
    }

    /// Append an operation. Declaration order is generation order.
    pub fn with_operation(mut self, op: Operation) -> Self {
        self.self_operations.push(op);
        self
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn has_fixed_initial_state(&self) -> bool {
        self.fixed_initial_state
    }

    pub fn self_operations(&self) -> &[Operation] {
        &self.self_operations
    }

    /// `component::basename`
    pub fn qualified_name(&self, component: &Component) -> String {
        format!("{}{}{}", component.name, NAMESPACE_SEPARATOR, self.basename)
    }

    fn validate(&self) -> Result<(), DomainError> {
        check_identifier("task", &self.basename)?;

        let mut seen = HashSet::new();
        for op in &self.self_operations {
            op.validate()?;
            if !seen.insert(op.method_name.as_str()) {
                return Err(DomainError::DuplicateOperation {
                    task: self.basename.clone(),
                    name: op.method_name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A custom operation exposed by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    method_name: String,
    arguments: Vec<Argument>,
    return_types: Vec<TypeRef>,
    doc: Option<String>,
}

impl Operation {
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            arguments: Vec::new(),
            return_types: Vec::new(),
            doc: None,
        }
    }

    /// Declare a return type. Only the first one is used by generated bodies.
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_types.push(ty);
        self
    }

    pub fn argument(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn return_types(&self) -> &[TypeRef] {
        &self.return_types
    }

    pub fn documentation(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn has_return_value(&self) -> bool {
        !self.return_types.is_empty()
    }

    /// Spelling of the return type in generated code.
    pub fn return_cxx(&self) -> &str {
        self.return_types
            .first()
            .map_or("void", |ty| ty.cxx_name.as_str())
    }

    /// `Status getStatus(bool verbose)`
    pub fn signature(&self) -> String {
        self.signature_with(&self.method_name)
    }

    /// Signature with the method name replaced by `name`, e.g. a
    /// class-qualified `Controller::getStatus`.
    pub fn signature_with(&self, name: &str) -> String {
        let args = self
            .arguments
            .iter()
            .map(Argument::cxx_signature)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} {}({})", self.return_cxx(), name, args)
    }

    fn validate(&self) -> Result<(), DomainError> {
        check_identifier("operation", &self.method_name)?;
        for ty in &self.return_types {
            check_type(ty, "return type")?;
        }
        for arg in &self.arguments {
            check_identifier("argument", &arg.name)?;
            check_type(&arg.ty, "argument type")?;
        }
        Ok(())
    }
}

fn check_type(ty: &TypeRef, field: &'static str) -> Result<(), DomainError> {
    if ty.cxx_name.trim().is_empty() {
        return Err(DomainError::MissingRequiredField { field });
    }
    Ok(())
}

/// A named, typed operation argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    name: String,
    #[serde(rename = "type")]
    ty: TypeRef,
}

impl Argument {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.ty
    }

    /// `bool verbose` for scalars, `Pose const& target` otherwise.
    pub fn cxx_signature(&self) -> String {
        if self.ty.is_scalar() {
            format!("{} {}", self.ty.cxx_name, self.name)
        } else {
            format!("{} const& {}", self.ty.cxx_name, self.name)
        }
    }
}

/// A type as spelled in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef {
    cxx_name: String,
}

const SCALAR_TYPES: &[&str] = &[
    "bool", "char", "short", "int", "long", "float", "double", "size_t", "int8_t", "int16_t",
    "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t", "uint64_t",
];

impl TypeRef {
    pub fn new(cxx_name: impl Into<String>) -> Self {
        Self {
            cxx_name: cxx_name.into(),
        }
    }

    pub fn cxx_name(&self) -> &str {
        &self.cxx_name
    }

    /// Scalars are passed by value in generated signatures.
    pub fn is_scalar(&self) -> bool {
        let name = self
            .cxx_name
            .trim_start_matches("std::")
            .trim_start_matches("unsigned ");
        SCALAR_TYPES.contains(&name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cxx_name)
    }
}
