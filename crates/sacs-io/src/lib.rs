//! I/O for the ETABS/SAP → SACS migration.
//!
//! This crate provides:
//! - **Table readers** for the joint, connectivity, assignment, section and
//!   material exports, each returning its accepted and dropped rows
//! - **SACS deck writer** for the geometry deck and the mudline joint list
//! - **Conversion pipeline** wiring readers, assembly and writer together,
//!   with an optional JSON run report

pub mod error;
pub mod pipeline;
pub mod readers;
pub mod sacs_writer;

pub use error::{ConvertError, Result};
pub use pipeline::{Conversion, ConversionConfig, ConversionReport, build_model, convert, save_report};
pub use readers::nodes::{LengthUnit, NodeTable};
pub use sacs_writer::{format_sci, render_geometry, render_mudline, write_deck};
