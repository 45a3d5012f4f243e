// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
// Pedantic lints - allow stylistic ones that don't affect correctness
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::match_same_arms)] // Intentional for clarity
// Internal implementation where bounds/values are known at compile time or checked
#![allow(clippy::indexing_slicing)] // Arena handles and sentinel-bounded scans
#![allow(clippy::cast_possible_truncation)] // Spans and handles are u32 by design

//! cppon - a JSON-superset value tree with zero-copy parsing
//!
//! # Overview
//!
//! This crate parses a JSON superset into a tagged tree of values and
//! prints it back, round-tripping everything the superset adds:
//!
//! - **Typed numbers** — `42i8`, `7u32`, `1.0f` carry their kind through
//!   parse and print; plain numbers stay **lazy** (a byte range plus a
//!   classified kind) until something needs the value.
//! - **Zero-copy strings** — string values are views into the source
//!   buffer, escapes preserved verbatim; the buffer lives inside the
//!   [`Document`] so views can never dangle.
//! - **References** — `"$cppon-path:/a/b"` parses to a path token that
//!   [`refs::resolve_paths`] turns into an in-tree pointer and
//!   [`refs::restore_paths`] turns back. The printer can flatten pointers
//!   or emit them as path strings, with cycles kept finite.
//! - **Blobs** — `"$cppon-blob:<base64>"` parses to a base64 token,
//!   decoded lazily or eagerly depending on the parse mode.
//!
//! The hot scanning primitives (quote finding, digit runs) dispatch at
//! runtime between a scalar baseline and 16/32/64-byte SIMD variants; see
//! [`scan`].
//!
//! # Quick Start
//!
//! ```
//! use cppon::{Document, ParseMode, PrintOptions};
//!
//! let mut doc = Document::parse(
//!     br#"{"user":{"name":"Alice","age":30}}"#,
//!     ParseMode::Quick,
//! ).unwrap();
//!
//! // Navigate with paths; numbers realize on first typed access.
//! assert_eq!(doc.get_strict_mut::<i64>("/user/age").unwrap(), 30);
//! assert_eq!(doc.get_strict::<String>("/user/name").unwrap(), "Alice");
//!
//! // Writes autovivify intermediate containers.
//! doc.set("/user/tags/1", "admin").unwrap();
//!
//! // Print strict JSON or the full superset.
//! let json = doc.print(&PrintOptions::json()).unwrap();
//! assert_eq!(json, r#"{"user":{"name":"Alice","age":30,"tags":[null,"admin"]}}"#);
//! ```
//!
//! # Parse modes
//!
//! | Mode | Tree | Numbers | Blobs |
//! |------|------|---------|-------|
//! | [`ParseMode::Parse`] | none (validate) | — | — |
//! | [`ParseMode::Quick`] | built | lazy tokens | base64 tokens |
//! | [`ParseMode::Eval`]  | built | converted | base64 tokens |
//! | [`ParseMode::Full`]  | built | converted | decoded |
//!
//! # Escapes
//!
//! String escapes are preserved verbatim on parse and are **not**
//! re-applied on print: what arrived between the quotes is what leaves.
//! Strings built through the write API are emitted as-is too, so callers
//! supplying text with quotes or backslashes must pre-escape it. This is a
//! stable contract of the format; a strict-escaping emission hook may be
//! added behind a printer option later.

pub mod codec;
pub mod constants;
mod document;
mod error;
mod getters;
mod nav;
mod node;
mod parser;
mod printer;
pub mod refs;
pub mod scan;
mod source;


pub use constants::Config;
pub use document::{Document, RootGuard};
pub use error::{Error, Result};
pub use getters::{Cast, Numeric, Strict};
pub use nav::Index;
pub use node::{Key, LazyNumber, Node, NodeId, NodeKind, NumberKind, Object, PathToken};
pub use parser::ParseMode;
pub use printer::{Compaction, PrintOptions};
pub use refs::PathBinding;
pub use scan::ScanWidth;
pub use source::{SourceBuffer, Span};
