//! Runtime values seen by template expressions.
//!
//! Every accessor a template can call returns a [`Value`]. Entity variants
//! borrow from the model, so evaluating a path never clones model data; the
//! accessor table of each variant lives in [`Value::attr`].

use std::borrow::Cow;

use crate::domain::entities::model::{Argument, Component, Operation, Task, TypeRef};

/// A task together with the component that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TaskRef<'a> {
    pub component: &'a Component,
    pub task: &'a Task,
}

/// An operation together with the task that declares it.
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    pub owner: TaskRef<'a>,
    pub op: &'a Operation,
}

#[derive(Debug, Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Int(usize),
    Str(Cow<'a, str>),
    List(Vec<Value<'a>>),
    Component(&'a Component),
    Task(TaskRef<'a>),
    Operation(OperationRef<'a>),
    Argument(&'a Argument),
    Type(&'a TypeRef),
}

impl<'a> Value<'a> {
    pub fn borrowed(s: &'a str) -> Self {
        Self::Str(Cow::Borrowed(s))
    }

    pub fn owned(s: String) -> Self {
        Self::Str(Cow::Owned(s))
    }

    /// Root value for a task of `component`.
    pub fn task(component: &'a Component, task: &'a Task) -> Self {
        Self::Task(TaskRef { component, task })
    }

    /// Type name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Component(_) => "component",
            Self::Task(_) => "task",
            Self::Operation(_) => "operation",
            Self::Argument(_) => "argument",
            Self::Type(_) => "type",
        }
    }

    /// Look up a field or zero-argument accessor.
    ///
    /// Returns `None` when the current value's type has no such accessor.
    pub fn attr(&self, name: &str) -> Option<Value<'a>> {
        match self {
            Self::Nil | Self::Bool(_) | Self::Int(_) => None,
            Self::Str(s) => match name {
                "size" | "length" => Some(Self::Int(s.chars().count())),
                "empty" => Some(Self::Bool(s.is_empty())),
                _ => None,
            },
            Self::List(items) => list_attr(items, name),
            Self::Component(c) => component_attr(*c, name),
            Self::Task(t) => task_attr(*t, name),
            Self::Operation(o) => operation_attr(*o, name),
            Self::Argument(a) => argument_attr(*a, name),
            Self::Type(t) => type_attr(*t, name),
        }
    }

    /// Textual form used by interpolation. Lists have none.
    pub fn to_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Self::Nil => Some(Cow::Borrowed("")),
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Self::Int(n) => Some(Cow::Owned(n.to_string())),
            Self::Str(s) => Some(s.clone()),
            Self::List(_) => None,
            Self::Component(c) => Some(Cow::Borrowed(c.name())),
            Self::Task(t) => Some(Cow::Owned(t.task.qualified_name(t.component))),
            Self::Operation(o) => Some(Cow::Borrowed(o.op.method_name())),
            Self::Argument(a) => Some(Cow::Borrowed(a.name())),
            Self::Type(t) => Some(Cow::Borrowed(t.cxx_name())),
        }
    }

    /// Boolean form used by guards. Only `Bool` and `Nil` convert.
    pub fn truthiness(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Nil => Some(false),
            _ => None,
        }
    }

    /// Equality used by `==` and `!=`: booleans by value, everything else
    /// by textual form.
    pub fn loose_eq(&self, other: &Value<'_>) -> bool {
        match (self, other) {
            (Self::Bool(a), Value::Bool(b)) => a == b,
            (Self::Bool(_), _) | (_, Value::Bool(_)) => false,
            _ => match (self.to_text(), other.to_text()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

fn list_attr<'a>(items: &[Value<'a>], name: &str) -> Option<Value<'a>> {
    match name {
        "first" => Some(items.first().cloned().unwrap_or(Value::Nil)),
        "last" => Some(items.last().cloned().unwrap_or(Value::Nil)),
        "size" | "length" | "count" => Some(Value::Int(items.len())),
        "empty" => Some(Value::Bool(items.is_empty())),
        "any" => Some(Value::Bool(!items.is_empty())),
        _ => None,
    }
}

fn component_attr<'a>(c: &'a Component, name: &str) -> Option<Value<'a>> {
    match name {
        "name" => Some(Value::borrowed(c.name())),
        "tasks" => Some(Value::List(
            c.tasks().iter().map(|task| Value::task(c, task)).collect(),
        )),
        _ => None,
    }
}

fn task_attr<'a>(t: TaskRef<'a>, name: &str) -> Option<Value<'a>> {
    match name {
        "basename" => Some(Value::borrowed(t.task.basename())),
        "name" => Some(Value::owned(t.task.qualified_name(t.component))),
        "component" => Some(Value::Component(t.component)),
        "fixed_initial_state" => Some(Value::Bool(t.task.has_fixed_initial_state())),
        "self_operations" | "operations" => Some(Value::List(
            t.task
                .self_operations()
                .iter()
                .map(|op| Value::Operation(OperationRef { owner: t, op }))
                .collect(),
        )),
        _ => None,
    }
}

fn operation_attr<'a>(o: OperationRef<'a>, name: &str) -> Option<Value<'a>> {
    let op = o.op;
    match name {
        "method_name" | "name" => Some(Value::borrowed(op.method_name())),
        "has_return_value" => Some(Value::Bool(op.has_return_value())),
        "return_type" | "return_types" => Some(Value::List(
            op.return_types().iter().map(Value::Type).collect(),
        )),
        "return_cxx" => Some(Value::borrowed(op.return_cxx())),
        "arguments" => Some(Value::List(
            op.arguments().iter().map(Value::Argument).collect(),
        )),
        "signature" => Some(Value::owned(op.signature())),
        "qualified_signature" => Some(Value::owned(op.signature_with(&format!(
            "{}::{}",
            o.owner.task.basename(),
            op.method_name()
        )))),
        "doc" => Some(op.documentation().map_or(Value::Nil, Value::borrowed)),
        "has_doc" => Some(Value::Bool(op.documentation().is_some())),
        "task" => Some(Value::Task(o.owner)),
        _ => None,
    }
}

fn argument_attr<'a>(a: &'a Argument, name: &str) -> Option<Value<'a>> {
    match name {
        "name" => Some(Value::borrowed(a.name())),
        "type" => Some(Value::Type(a.type_ref())),
        "cxx_signature" => Some(Value::owned(a.cxx_signature())),
        _ => None,
    }
}

fn type_attr<'a>(t: &'a TypeRef, name: &str) -> Option<Value<'a>> {
    match name {
        "cxx_name" | "name" => Some(Value::borrowed(t.cxx_name())),
        "scalar" => Some(Value::Bool(t.is_scalar())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::model::{Operation, Task};

    fn component() -> Component {
        Component::new("nav").with_task(
            Task::new("Controller")
                .fixed_initial_state(true)
                .with_operation(Operation::new("reset"))
                .with_operation(Operation::new("getStatus").returns(TypeRef::new("Status"))),
        )
    }

    #[test]
    fn task_accessors() {
        let c = component();
        let task = Value::task(&c, &c.tasks()[0]);

        assert_eq!(task.attr("basename").unwrap().to_text().unwrap(), "Controller");
        assert_eq!(task.attr("name").unwrap().to_text().unwrap(), "nav::Controller");
        assert_eq!(
            task.attr("component").unwrap().attr("name").unwrap().to_text().unwrap(),
            "nav"
        );
        assert_eq!(
            task.attr("fixed_initial_state").unwrap().truthiness(),
            Some(true)
        );
        assert!(task.attr("no_such_thing").is_none());
    }

    #[test]
    fn operation_list_preserves_order() {
        let c = component();
        let task = Value::task(&c, &c.tasks()[0]);
        let Some(Value::List(ops)) = task.attr("self_operations") else {
            panic!("expected a list");
        };
        let names: Vec<_> = ops
            .iter()
            .map(|op| op.attr("method_name").unwrap().to_text().unwrap().into_owned())
            .collect();
        assert_eq!(names, ["reset", "getStatus"]);
    }

    #[test]
    fn first_of_empty_list_is_nil() {
        let list = Value::List(Vec::new());
        assert!(matches!(list.attr("first"), Some(Value::Nil)));
        assert!(Value::Nil.attr("cxx_name").is_none());
    }

    #[test]
    fn qualified_signature_uses_owner_basename() {
        let c = component();
        let task = Value::task(&c, &c.tasks()[0]);
        let Some(Value::List(ops)) = task.attr("self_operations") else {
            panic!("expected a list");
        };
        assert_eq!(
            ops[1].attr("qualified_signature").unwrap().to_text().unwrap(),
            "Status Controller::getStatus()"
        );
    }

    #[test]
    fn truthiness_only_for_bool_and_nil() {
        assert_eq!(Value::Bool(true).truthiness(), Some(true));
        assert_eq!(Value::Nil.truthiness(), Some(false));
        assert_eq!(Value::borrowed("yes").truthiness(), None);
        assert_eq!(Value::List(Vec::new()).truthiness(), None);
    }

    #[test]
    fn lists_have_no_text() {
        assert!(Value::List(Vec::new()).to_text().is_none());
    }

    #[test]
    fn loose_equality() {
        assert!(Value::borrowed("a").loose_eq(&Value::owned("a".into())));
        assert!(Value::Int(2).loose_eq(&Value::borrowed("2")));
        assert!(!Value::Bool(true).loose_eq(&Value::borrowed("true")));
        assert!(Value::Bool(false).loose_eq(&Value::Bool(false)));
    }
}
