// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for editing operations

use thiserror::Error;

/// Errors surfaced by the editing core.
///
/// Precondition failures (no mesh selected, too few control points, a drag
/// update with no open session) are not errors: those calls are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A vertex or triangle index does not address the buffer.
    #[error("Index {index} out of range (buffer holds {len} vertices)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Subdivision depth must be at least 1.
    #[error("Invalid subdivision level: {0} (must be >= 1)")]
    InvalidSubdivisionLevel(u32),

    /// Subdivision depth exceeds the configured ceiling.
    #[error("Subdivision level {level} exceeds maximum {max}")]
    SubdivisionLevelTooHigh { level: u32, max: u32 },

    /// Subdivision result would exceed the configured face budget.
    #[error("Subdivision would exceed maximum mesh size ({current} -> {projected} faces, max {max})")]
    MeshTooLarge {
        current: usize,
        projected: usize,
        max: usize,
    },

    /// The operation exists in the tool but has no implementation.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

/// Result type for editing operations.
pub type EditResult<T> = std::result::Result<T, EditError>;
