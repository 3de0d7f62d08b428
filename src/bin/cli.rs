// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyedit CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;
use polyedit::cli::Reporter;
use polyedit::geometry::{Primitive, SubdivisionMethod};
use polyedit::io::{self, EditScript};
use polyedit::{Editor, EditorConfig, Mesh};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "polyedit")]
#[command(about = "Polyedit - interactive mesh editing core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./polyedit.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an edit script
    Run {
        /// JSON edit script
        script: PathBuf,

        /// Export the selected mesh (or the last one created) to STL
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write ASCII instead of binary STL
        #[arg(long)]
        ascii: bool,
    },

    /// Generate a primitive, optionally subdivided
    Primitive {
        kind: PrimitiveKind,

        /// Edge length for cubes, radius otherwise
        #[arg(short, long, default_value = "1.0")]
        size: f64,

        /// Segments around round primitives
        #[arg(long, default_value = "32")]
        segments: u32,

        /// Subdivision levels to apply
        #[arg(long)]
        subdivide: Option<u32>,

        /// Subdivision scheme (defaults to the configured one)
        #[arg(long)]
        method: Option<SubdivisionMethod>,

        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,

        /// Write ASCII instead of binary STL
        #[arg(long)]
        ascii: bool,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrimitiveKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Tetrahedron,
}

impl PrimitiveKind {
    fn build(self, size: f64, segments: u32) -> Primitive {
        match self {
            Self::Cube => Primitive::cube(Vector3::new(size, size, size), true),
            Self::Sphere => Primitive::sphere(size, segments),
            Self::Cylinder => Primitive::cylinder(2.0 * size, size, segments),
            Self::Cone => Primitive::cone(2.0 * size, size, size / 4.0, segments),
            Self::Tetrahedron => Primitive::tetrahedron(size),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        Reporter::report_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "polyedit=debug" } else { "polyedit=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            script,
            output,
            ascii,
        } => {
            let config = load_config(cli.config.as_deref())?;
            run_command(&script, output.as_deref(), ascii, config)
        }
        Commands::Primitive {
            kind,
            size,
            segments,
            subdivide,
            method,
            output,
            ascii,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let primitive = kind.build(size, segments);
            primitive_command(&primitive, subdivide, method, &output, ascii, config)
        }
        Commands::Version => {
            println!("Polyedit v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => {
            let mut config = EditorConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config.validate()?;
            Ok(config)
        }
        None => EditorConfig::load(),
    }
}

fn run_command(script_path: &Path, output: Option<&Path>, ascii: bool, config: EditorConfig) -> Result<()> {
    let script = EditScript::from_file(script_path)?;
    let mut editor = Editor::with_config(config)?;

    let start = Instant::now();
    let report = script.run(&mut editor)?;
    Reporter::report_script(&script_path.display().to_string(), &report, &editor, start.elapsed());

    if let Some(output) = output {
        let target = editor
            .selected_object()
            .filter(|&id| editor.mesh(id).is_some())
            .or_else(|| report.last_mesh(&editor));

        match target.and_then(|id| editor.mesh(id)) {
            Some(mesh) => {
                export(mesh, output, ascii)?;
                Reporter::success(&format!("Exported {}", output.display()));
            }
            None => Reporter::report_warning("Script left no mesh to export"),
        }
    }

    Ok(())
}

fn primitive_command(
    primitive: &Primitive,
    levels: Option<u32>,
    method: Option<SubdivisionMethod>,
    output: &Path,
    ascii: bool,
    config: EditorConfig,
) -> Result<()> {
    let mut editor = Editor::with_config(config)?;
    let start = Instant::now();

    let id = editor.add_primitive(primitive);
    editor.select_object(Some(id));
    if let Some(method) = method {
        editor.set_subdivision_method(method);
    }
    if let Some(levels) = levels {
        editor.set_subdivision_level(levels)?;
        editor.apply_subdivision()?;
    }

    let mesh = editor
        .mesh(id)
        .context("Generated primitive is missing from the scene")?;
    Reporter::report_mesh(primitive.name(), mesh, start.elapsed());

    export(mesh, output, ascii)?;
    Reporter::success(&format!("Exported {}", output.display()));
    Ok(())
}

fn export(mesh: &Mesh, output: &Path, ascii: bool) -> Result<()> {
    if ascii {
        io::export_stl_ascii(mesh, output)
    } else {
        io::export_stl(mesh, output)
    }
}
