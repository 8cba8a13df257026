//! skelgen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the skelgen
//! source skeleton generator: the component model, the template expression
//! evaluator, the template renderer and the ports the adapters implement.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           skelgen-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (render, GenerateService)           │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (ProjectLoader, TemplateStore, Fs)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     skelgen-adapters (Infrastructure)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Component, Expr, Template, Value)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use skelgen_core::prelude::*;
//!
//! let component = Component::new("nav").with_task(
//!     Task::new("Controller")
//!         .with_operation(Operation::new("getStatus").returns(TypeRef::new("Status"))),
//! );
//! let model = TaskModel::find(&component, "Controller").unwrap();
//!
//! let template = Template::parse(
//!     "<% each op in task.self_operations %><%= op.qualified_signature %>;<% end %>",
//! )
//! .unwrap();
//! assert_eq!(
//!     render(&template, &model).unwrap(),
//!     "Status Controller::getStatus();"
//! );
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub use application::services::generator::{render, render_source};

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateService, GenerationOptions, GenerationReport, TaskModel,
        ports::{Filesystem, ProjectLoader, TemplateStore},
        render, render_source,
    };
    pub use crate::domain::{
        Component, GeneratedFile, GenerationPlan, Operation, RenderError, Scope, Skeleton, Task,
        Template, TypeRef, Value,
    };
    pub use crate::error::{SkelgenError, SkelgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
