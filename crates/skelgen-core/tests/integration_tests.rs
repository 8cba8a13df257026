//! Integration tests for skelgen-core's public API.

use skelgen_core::{
    domain::{EvalError, RenderErrorKind},
    prelude::*,
};

const TASK_CPP: &str = r#"#include "<%= task.basename %>.hpp"

using namespace <%= task.component.name %>;

<%= task.basename %>::<%= task.basename %>(std::string const& name<%= ", TaskCore::TaskState initial_state" unless task.fixed_initial_state? %>)
    : <%= task.basename %>Base(name<%= ", initial_state" unless task.fixed_initial_state? %>)
{
}

<% each op in task.self_operations %>
<%= op.qualified_signature %>
{
    <% if op.has_return_value? %>
    return <%= op.return_type.first.cxx_name %>();
    <% end %>
}
<% end %>
// end of <%= task.name %>
"#;

fn nav(fixed_initial_state: bool) -> Component {
    Component::new("nav").with_task(
        Task::new("Controller")
            .fixed_initial_state(fixed_initial_state)
            .with_operation(Operation::new("reset"))
            .with_operation(Operation::new("getStatus").returns(TypeRef::new("Status"))),
    )
}

#[test]
fn test_nav_controller_end_to_end() {
    let component = nav(false);
    let model = TaskModel::find(&component, "Controller").unwrap();

    let output = render_source(TASK_CPP, &model).unwrap();

    assert_eq!(
        output,
        r#"#include "Controller.hpp"

using namespace nav;

Controller::Controller(std::string const& name, TaskCore::TaskState initial_state)
    : ControllerBase(name, initial_state)
{
}

void Controller::reset()
{
}
Status Controller::getStatus()
{
    return Status();
}
// end of nav::Controller
"#
    );
}

#[test]
fn test_fixed_initial_state_drops_constructor_parameter() {
    let component = nav(true);
    let model = TaskModel::find(&component, "Controller").unwrap();

    let output = render_source(TASK_CPP, &model).unwrap();

    assert!(output.contains("Controller::Controller(std::string const& name)\n"));
    assert!(output.contains("    : ControllerBase(name)\n"));
    assert!(!output.contains("initial_state"));
}

#[test]
fn test_only_first_return_type_is_rendered() {
    let component = Component::new("nav").with_task(
        Task::new("Controller").with_operation(
            Operation::new("pair")
                .returns(TypeRef::new("First"))
                .returns(TypeRef::new("Second")),
        ),
    );
    let model = TaskModel::find(&component, "Controller").unwrap();

    let body = render_source(
        "<% each op in task.self_operations %>\n<% if op.has_return_value? %>\n    return <%= op.return_type.first.cxx_name %>();\n<% end %>\n<% end %>\n",
        &model,
    )
    .unwrap();
    assert_eq!(body, "    return First();\n");

    let output = render_source(TASK_CPP, &model).unwrap();
    assert!(output.contains("First Controller::pair()\n{\n    return First();\n}\n"));
    assert!(!output.contains("Second"));
}

#[test]
fn test_parse_once_render_many_tasks() {
    let component = nav(false).with_task(Task::new("Planner").fixed_initial_state(true));
    let template = Template::parse(TASK_CPP).unwrap();

    let outputs: Vec<_> = component
        .tasks()
        .iter()
        .map(|task| render(&template, &TaskModel::new(&component, task)).unwrap())
        .collect();

    assert!(outputs[0].contains("// end of nav::Controller"));
    assert!(outputs[1].contains("Planner::Planner(std::string const& name)\n"));
    assert!(!outputs[1].contains("return"));
}

#[test]
fn test_rendering_from_threads() {
    let component = nav(false);
    let template = Template::parse(TASK_CPP).unwrap();
    let expected = render(&template, &TaskModel::find(&component, "Controller").unwrap()).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    let model = TaskModel::find(&component, "Controller").unwrap();
                    render(&template, &model).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_misspelled_accessor_reports_line_and_path() {
    let component = nav(false);
    let model = TaskModel::find(&component, "Controller").unwrap();
    let template = TASK_CPP.replace("op.return_type.first.cxx_name", "op.return_type.first.cxxname");

    let err: RenderError = render_source(&template, &model).unwrap_err();

    assert_eq!(err.line, 14);
    assert_eq!(err.path(), Some("op.return_type.first.cxxname"));
    assert!(matches!(
        err.kind,
        RenderErrorKind::Eval(EvalError::UnresolvedPath { ref segment, .. }) if segment == "cxxname"
    ));
}
