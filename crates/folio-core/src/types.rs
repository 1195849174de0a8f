//! Core type definitions for the page runtime
//!
//! This module centralizes type aliases used throughout the crate
//! for consistency and discoverability.

/// Page element handle
///
/// Hosts assign a handle the first time they hand an element to the core.
/// Handles are unique within one page and never reused while it is loaded.
pub type ElementId = u32;

/// DOM id attribute of a modal dialog (e.g. `"project-modal"`)
pub type ModalId = String;
