//! Lens module
//!
//! This module provides high-level "lens" abstractions that combine business logic
//! with output formatting. Lenses are designed to be reusable across different
//! interfaces (CLI, GUI, scripts).
//!
//! # Feature Requirements
//!
//! | Lens | Feature Required | Dependencies |
//! |------|-----------------|--------------|
//! | `IpLens` (classification, normalization) | `lens-core` | serde_json |
//! | `IpLens` (DoH resolver, HTTP providers) | `lens-net` | ureq |
//!
//! # Architecture
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g., `IpLens`) - the main entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types
//!
//! # Usage
//!
//! ```rust,ignore
//! use iptrack::lens::ip::{classify, normalize, IpLens, IpLookupArgs, CanonicalLocation};
//! ```

// =============================================================================
// Utility module (always available when any lens feature is enabled)
// =============================================================================
pub mod utils;

// =============================================================================
// Core lenses (lens-core feature)
// =============================================================================

// IpLens - query classification, provider normalization, lookup orchestration
#[cfg(feature = "lens-core")]
pub mod ip;
