//! # Riboframe Core Library
//!
//! A structure loader that turns raw crystallographic table data (the kind
//! found in an mmCIF file) into a hierarchical molecular model and
//! geometrically normalizes each residue against canonical reference
//! geometry.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict dependency direction,
//! so the stateless pieces stay independently testable.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Residue`,
//!   `Structure`), the in-memory table boundary that stands in for an
//!   external mmCIF reader, pure numerical geometry (Kabsch superposition),
//!   and the supplied geometry-template catalog.
//!
//! - **[`loader`]: The Logic Core.** The stateful pipeline that consumes a
//!   table set: symmetry catalog construction, operator expansion of atom
//!   rows, alternate-location grouping, per-residue frame normalization and
//!   hydrogen inference, and experimental-sequence mapping. Every
//!   degradation is reported through an explicit diagnostics sink.

pub mod core;
pub mod loader;
