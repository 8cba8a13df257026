//! The rendering entry point.
//!
//! `render` composes the template renderer with a root scope built from a
//! [`TaskModel`]. It has no side effects and may be called concurrently on
//! the same template and model.

use crate::domain::{Component, DomainError, RenderError, Scope, Task, Template, Value};

/// The model a skeleton is rendered against: one task and the component
/// that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TaskModel<'a> {
    pub component: &'a Component,
    pub task: &'a Task,
}

impl<'a> TaskModel<'a> {
    pub fn new(component: &'a Component, task: &'a Task) -> Self {
        Self { component, task }
    }

    /// Select a task of `component` by basename or qualified name.
    pub fn find(component: &'a Component, name: &str) -> Result<Self, DomainError> {
        Ok(Self::new(component, component.task(name)?))
    }

    /// One model per task, in declaration order.
    pub fn all(component: &'a Component) -> impl Iterator<Item = TaskModel<'a>> {
        component
            .tasks()
            .iter()
            .map(move |task| Self::new(component, task))
    }

    /// Root scope: `component` and `task`.
    pub fn scope(&self) -> Scope<'a> {
        Scope::new()
            .with("component", Value::Component(self.component))
            .with("task", Value::task(self.component, self.task))
    }

    pub fn qualified_name(&self) -> String {
        self.task.qualified_name(self.component)
    }
}

/// Render a parsed template for one task.
pub fn render(template: &Template, model: &TaskModel<'_>) -> Result<String, RenderError> {
    let mut scope = model.scope();
    template.render(&mut scope)
}

/// Parse `source` and render it. Syntax errors surface as `RenderError`s
/// of kind `Syntax`.
pub fn render_source(source: &str, model: &TaskModel<'_>) -> Result<String, RenderError> {
    render(&Template::parse(source)?, model)
}
