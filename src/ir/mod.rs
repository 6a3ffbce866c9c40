//! Intermediate Representation (IR) for panink.
//!
//! This module defines the canonical, format-agnostic representation of a
//! captured handwritten page. It serves as the central "hub" that all
//! format conversions pass through, similar to how Pandoc uses an internal
//! AST for document conversion.
//!
//! # Design Principles
//!
//! 1. **Canonical Units**: every coordinate in the IR is millimeters;
//!    each reader converts from its device-native unit system exactly
//!    once, using the fixed scalars in [`units`].
//!
//! 2. **Permissive Construction**: the IR can represent defective
//!    captures (ink in the margins, off-page dots, unresolved
//!    coordinates) so that analysis can report issues rather than parsing
//!    panicking over them.
//!
//! 3. **Exclusive Ownership**: a page owns its strokes and a stroke owns
//!    its dots; metadata maps are built per entity and never shared.
//!
//! # Example
//!
//! ```
//! use panink::ir::{Dot, Page, Stroke};
//!
//! let mut page = Page::new();
//! page.width = 210.0;
//! page.height = 297.0;
//! page.add_stroke(
//!     Stroke::new(0, 100)
//!         .with_dot(Dot::new(12.5, 20.0, 0))
//!         .with_dot(Dot::new(13.0, 21.5, 100)),
//! );
//!
//! assert_eq!(page.dots().count(), 2);
//! ```

pub mod io_csv;
pub mod io_inkml;
pub mod io_neonotes;
pub mod io_page_json;
pub mod io_protocol_xml;
pub mod io_svg;
mod model;
pub mod paper;
pub mod units;

// Re-export core types for convenient access
pub use model::{CaptureError, Dot, DotKind, MetaValue, Metadata, Page, Stroke};
