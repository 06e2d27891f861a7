//! # memdump core
//!
//! Frame decoder for memory dumps received over a serial link.
//!
//! A dump frame carries a `;`-separated column header followed by a matrix
//! of 4-byte little-endian cells, delimited by fixed markers. This crate
//! provides:
//! - The marker scanner and protocol constants
//! - Header extraction into column names
//! - Matrix decoding with coalesced progress reporting
//! - [`FrameDecoder`], composing the above into a [`Dataset`]
//! - [`IncrementalDecoder`] for buffers that grow between calls
//! - [`FrameEncoder`] for building frames (simulated devices, fixtures)

pub mod buffer;
pub mod dataset;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod incremental;
pub mod marker;
pub mod matrix;
pub mod progress;

pub use buffer::ReadBuffer;
pub use dataset::{Cell, Dataset, Row};
pub use decoder::{DecoderConfig, FrameDecoder, decode};
pub use encoder::FrameEncoder;
pub use error::{DecodeError, Result};
pub use header::{COLUMN_SEPARATOR, HeaderRegion, extract_columns};
pub use incremental::IncrementalDecoder;
pub use marker::{LOG_START, LOG_STOP, Marker, VALUES_START, find_first};
pub use matrix::{CELL_WIDTH, CellEncoding, Matrix, decode_matrix};
pub use progress::{LogProgress, NoProgress, ProgressSink};
