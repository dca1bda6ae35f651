//! olxbank - Pure-Rust question bank spreadsheet to OLX content library converter
//!
//! This crate converts a tabular question bank (a spreadsheet following a fixed
//! sheet/column convention) into a version-control-friendly OLX content library
//! bundle for an e-learning platform, compressed as a single tar.gz archive.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use olxbank::ImporterBuilder;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an importer with default settings
//!     let importer = ImporterBuilder::new().build()?;
//!
//!     // Convert the question bank into an OLX library archive
//!     let outcome = importer.import(Path::new("bank.xlsx"))?;
//!
//!     if outcome.is_success() {
//!         println!("archive ready: {}", outcome.archive_path.display());
//!     } else {
//!         // Recoverable problems (rejected rows, missing sheets) are
//!         // collected per line; the archive is still produced.
//!         for line in &outcome.error_lines {
//!             eprintln!("{}", line);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Input convention
//!
//! The input file may be `.csv`, `.xls` or `.xlsx`; any other extension fails
//! with [`ImportError::UnsupportedFormat`]. A workbook is expected to carry the
//! sheets `Library Description`, `Checkboxes`, `Multiple Choice-Drop Down`,
//! `Numerical Input` and `Text Input` (names exact). A missing sheet degrades
//! to one error line and an empty question list for that type.
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use olxbank::ImporterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let importer = ImporterBuilder::new()
//!         .with_output_dir("/var/exports")   // final archive location
//!         .with_tolerance("1%")              // numerical answer tolerance
//!         .build()?;
//!     # let _ = importer;
//!     Ok(())
//! }
//! ```
//!
//! # Output layout
//!
//! The final archive unpacks to a `question_banks/` folder holding one
//! `<lesson>_<difficulty>.tar.gz` per non-empty (lesson, difficulty) bucket and,
//! if any rows were rejected, an `errors.txt` report. Each partition archive in
//! turn unpacks to `library.xml`, `problem/*.xml` and `policies/assets.json`.

mod archive;
mod builder;
mod error;
mod group;
mod library;
mod olx;
mod reader;
mod rows;
mod types;
mod validate;

// 公開API
pub use builder::{ImportOutcome, Importer, ImporterBuilder};
pub use error::ImportError;
pub use types::{Difficulty, Question, QuestionType};
