//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. Handlers live in [`crate::commands`].

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "skelgen",
    bin_name = "skelgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate C++ task skeletons from a component description",
    long_about = "skelgen renders source skeletons for every task of a component. \
                  Each file is written twice: a pristine copy under templates/ that \
                  is refreshed on every run, and an editable copy that is only \
                  created when missing.",
    after_help = "EXAMPLES:\n\
        \x20 skelgen init nav\n\
        \x20 skelgen generate nav/nav.toml\n\
        \x20 skelgen render nav/nav.toml --task Controller --skeleton task.hpp\n\
        \x20 skelgen list nav/nav.toml\n\
        \x20 skelgen completions bash > /usr/share/bash-completion/completions/skelgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render every skeleton for every task and write the results.
    #[command(
        visible_alias = "gen",
        about = "Generate task skeletons for a project",
        after_help = "EXAMPLES:\n\
            \x20 skelgen generate nav.toml\n\
            \x20 skelgen generate nav.toml --output build/nav --dry-run\n\
            \x20 skelgen generate nav.toml --task Controller --force\n\
            \x20 skelgen generate nav.json --templates my-skeletons"
    )]
    Generate(GenerateArgs),

    /// Render a single skeleton or template file to stdout.
    #[command(
        about = "Render one skeleton for one task to stdout",
        after_help = "EXAMPLES:\n\
            \x20 skelgen render nav.toml --skeleton task.cpp\n\
            \x20 skelgen render nav.toml --task Controller --template header.erb"
    )]
    Render(RenderArgs),

    /// List skeletons, or the tasks of a project.
    #[command(
        visible_alias = "ls",
        about = "List skeletons or project tasks",
        after_help = "EXAMPLES:\n\
            \x20 skelgen list\n\
            \x20 skelgen list --format json\n\
            \x20 skelgen list nav.toml"
    )]
    List(ListArgs),

    /// Write an example project description.
    #[command(
        about = "Create an example project",
        after_help = "EXAMPLES:\n\
            \x20 skelgen init                    # ./skelgen.toml\n\
            \x20 skelgen init nav --name nav\n\
            \x20 skelgen init nav --with-templates"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 skelgen completions bash > ~/.local/share/bash-completion/completions/skelgen\n\
            \x20 skelgen completions zsh  > ~/.zfunc/_skelgen\n\
            \x20 skelgen completions fish > ~/.config/fish/completions/skelgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the skelgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 skelgen config get templates.dir\n\
            \x20 skelgen config set generation.force true\n\
            \x20 skelgen config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `skelgen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project description (`.toml` or `.json`).
    #[arg(value_name = "PROJECT", help = "Project description file")]
    pub project: PathBuf,

    /// Root the generated files are written under.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: the project file's directory)"
    )]
    pub output: Option<PathBuf>,

    /// Overwrite editable copies that differ from the generated text.
    #[arg(short = 'f', long = "force", help = "Overwrite edited files")]
    pub force: bool,

    /// Render and compare, but write nothing.
    #[arg(long = "dry-run", help = "Show what would be written without writing")]
    pub dry_run: bool,

    /// Generate a single task.
    #[arg(
        short = 't',
        long = "task",
        value_name = "TASK",
        help = "Only generate this task (basename or qualified name)"
    )]
    pub task: Option<String>,

    /// Skeleton override directory.
    #[arg(
        long = "templates",
        value_name = "DIR",
        help = "Directory of skeleton files replacing or adding to the built-ins"
    )]
    pub templates: Option<PathBuf>,
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `skelgen render`.
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["skeleton", "template"]),
))]
pub struct RenderArgs {
    /// Project description (`.toml` or `.json`).
    #[arg(value_name = "PROJECT", help = "Project description file")]
    pub project: PathBuf,

    /// Task to render for; may be omitted when the project has one task.
    #[arg(short = 't', long = "task", value_name = "TASK", help = "Task to render")]
    pub task: Option<String>,

    /// Name of a loaded skeleton, e.g. `task.cpp`.
    #[arg(
        short = 's',
        long = "skeleton",
        value_name = "NAME",
        help = "Skeleton to render"
    )]
    pub skeleton: Option<String>,

    /// Template file rendered as-is.
    #[arg(long = "template", value_name = "FILE", help = "Template file to render")]
    pub template: Option<PathBuf>,

    /// Skeleton override directory.
    #[arg(long = "templates", value_name = "DIR", help = "Skeleton override directory")]
    pub templates: Option<PathBuf>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `skelgen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// List this project's tasks and operations instead of skeletons.
    #[arg(value_name = "PROJECT", help = "Project description file")]
    pub project: Option<PathBuf>,

    /// Skeleton override directory.
    #[arg(long = "templates", value_name = "DIR", help = "Skeleton override directory")]
    pub templates: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON document.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `skelgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to create the project in.
    #[arg(value_name = "DIR", default_value = ".", help = "Project directory")]
    pub path: PathBuf,

    /// Component name written into the example.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Component name")]
    pub name: Option<String>,

    /// Also copy the built-in skeletons for editing.
    #[arg(
        long = "with-templates",
        help = "Copy the built-in skeletons into <DIR>/skeletons"
    )]
    pub with_templates: bool,

    /// Overwrite existing files.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `skelgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `skelgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.dir`.
        key: String,
    },
    /// Set a configuration key in the configuration file.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path to the active configuration file.
    Path,
    /// Write a configuration file holding the defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
