//! # memdump
//!
//! Decode memory dumps received from a data logger over a serial link.
//!
//! The logger answers a dump request by streaming a single frame: a
//! `;`-separated list of column names followed by a matrix of 4-byte
//! little-endian values. This crate ties together the pieces needed to
//! turn that byte stream into a table.
//!
//! ## Quick Start
//!
//! ```
//! use memdump::prelude::*;
//!
//! let bytes = FrameEncoder::new(["X", "Y", "Z"])
//!     .row([1, 2, 3])
//!     .row([256, 0, 65535])
//!     .finish();
//!
//! let dataset = FrameDecoder::new().decode(&bytes)?;
//! assert_eq!(dataset.height(), 2);
//!
//! let mut csv = Vec::<u8>::new();
//! write_csv(&dataset, &mut csv, &CsvOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Markers, header and matrix decoding, datasets
//! - [`capture`] - Capture buffer and dump session over an async stream
//! - [`export`] - CSV serialization

pub mod prelude;

/// Frame decoding and the dataset model.
pub mod core {
    pub use memdump_core::*;
}

/// Capture buffer and dump session.
pub mod capture {
    pub use memdump_capture::*;
}

/// Dataset export.
pub mod export {
    pub use memdump_export::*;
}
