//! Application services - orchestrate use cases.
//!
//! `generator` is the pure `render(template, model)` entry point;
//! `generate_service` drives a whole run from project file to output tree.

pub mod generate_service;
pub mod generator;

pub use generate_service::{
    FileAction, FileOutcome, GenerateService, GenerationOptions, GenerationReport, SkeletonInfo,
};
pub use generator::{TaskModel, render, render_source};
