//! Rust library for locating adapters in sequencing reads.
//!
//! # Overview
//! readmux finds short adapter/barcode patterns inside reads, tolerating a
//! bounded number of substitutions and handling adapters cut off by the
//! read boundary. The returned position splits a read into an
//! adapter/barcode region and a payload region, which is the core step of
//! demultiplexing and trimming pipelines.
//!
//! This is useful for:
//! * Demultiplexing pooled libraries by inline barcodes
//! * Trimming sequencing adapters off reads
//! * Writing custom read preprocessing tools
//!
//! ## Matching
//! An [`Adapter`] is built once per adapter definition and reused across
//! reads. [`Adapter::locate`] scans every full-length window of the query
//! and keeps the one with the fewest mismatches within the error budget;
//! positional ties go to the left (or to the right for a `rightmost`
//! matcher). When no full window qualifies, a partial occurrence is
//! accepted at the query boundary the search direction allows — the front
//! for leftmost matchers, the back for rightmost ones — taking the longest
//! overlap of at least `min_overlap` bases within the budget. A full
//! match, however imperfect, always beats a partial one.
//!
//! ## Positions
//! Leftmost matchers report a non-negative offset from the start of the
//! query; rightmost matchers report `boundary - N`, a non-positive offset
//! from the end. Signed positions plug directly into
//! [`Read::clip_before`] and [`Read::clip_from`], so trimming one side of
//! a read never invalidates a position located on the other side.
//!
//! ```
//! use readmux::{Adapter, AdapterOpts};
//!
//! let adapter = Adapter::new("ADAPTER", AdapterOpts::default()).unwrap();
//! assert_eq!(adapter.locate(b"TCA_ADAPTER_XYZ"), Some(11));
//! ```
//!
//! ## Plumbing
//! The rest of the crate is the demultiplexing plumbing around the
//! matcher: FASTQ input as [`Fragment`] streams ([`fastq`]), reverse
//! complementation ([`read`]), sample sheets resolving barcode tables into
//! per-sample matchers ([`samples`]), YAML adapter definition sets
//! ([`patterns`]), position-driven trimming ([`trim`]), and output files
//! that only become visible once complete ([`output`]).

pub mod adapter;
pub mod errors;
pub mod fastq;
pub mod output;
pub mod patterns;
pub mod read;
pub mod samples;
pub mod trim;

// commonly used functions and types

pub use crate::adapter::*;
pub use crate::fastq::*;
pub use crate::output::*;
pub use crate::patterns::*;
pub use crate::read::*;
pub use crate::samples::*;
pub use crate::trim::*;
