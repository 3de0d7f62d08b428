// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - edit scripts, importing, and exporting

mod script;
mod stl;

pub use script::{EditCommand, EditScript, ScriptReport};
pub use stl::{export_stl, export_stl_ascii, import_stl};
