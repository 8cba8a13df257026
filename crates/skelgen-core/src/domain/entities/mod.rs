pub mod common;
pub mod generation;
pub mod model;
pub mod skeleton;

pub use crate::domain::DomainError;
pub use generation::{GeneratedFile, GenerationPlan};
pub use model::{Argument, Component, Operation, Task, TypeRef};
pub use skeleton::Skeleton;
