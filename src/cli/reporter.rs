// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::editor::Editor;
use crate::geometry::mesh_utils::validate_mesh;
use crate::geometry::Mesh;
use crate::io::ScriptReport;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report a finished mesh with its validation summary
    pub fn report_mesh(label: &str, mesh: &Mesh, duration: Duration) {
        let validation = validate_mesh(mesh);
        let size = mesh.bounds().size();

        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Mesh:".bold(), label.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_field("Vertices", mesh.vertex_count().to_string().cyan());
        Self::print_field("Triangles", mesh.triangle_count().to_string().cyan());
        Self::print_field(
            "Size",
            format!("{:.3} x {:.3} x {:.3}", size.x, size.y, size.z).cyan(),
        );
        Self::print_field("Closed", Self::flag(validation.is_closed));
        Self::print_field("Manifold", Self::flag(validation.is_manifold));
        Self::print_field("Winding", Self::flag(validation.has_valid_winding));
        Self::print_field("Time", Self::format_duration(duration).yellow());
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the objects an edit script left behind
    pub fn report_script(script: &str, report: &ScriptReport, editor: &Editor, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Script:".bold(), script.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_field("Commands", report.executed.to_string().cyan());
        Self::print_field("Created", report.created.len().to_string().cyan());

        for (index, id) in report.created.iter().enumerate() {
            match editor.object(*id) {
                Some(object) => {
                    let detail = match object.as_mesh() {
                        Some(mesh) => format!(
                            "{} vertices, {} triangles",
                            mesh.vertex_count(),
                            mesh.triangle_count()
                        ),
                        None => String::new(),
                    };
                    println!(
                        "  {} {} {}",
                        format!("#{}", index).bright_black(),
                        object.kind().cyan(),
                        detail.bright_black()
                    );
                }
                None => println!(
                    "  {} {}",
                    format!("#{}", index).bright_black(),
                    "removed".bright_black()
                ),
            }
        }

        Self::print_field("Time", Self::format_duration(duration).yellow());
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_field(name: &str, value: ColoredString) {
        println!("  {} {}", format!("{}:", name).bright_black(), value);
    }

    fn flag(value: bool) -> ColoredString {
        if value {
            "yes".green()
        } else {
            "no".yellow()
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
