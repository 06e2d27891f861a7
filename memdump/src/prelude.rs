//! Commonly used types, re-exported for convenience.
//!
//! ```
//! use memdump::prelude::*;
//! ```

pub use memdump_core::{
    Cell, CellEncoding, Dataset, DecodeError, FrameDecoder, FrameEncoder, IncrementalDecoder,
    LogProgress, NoProgress, ProgressSink, ReadBuffer, Row, decode,
};

pub use memdump_capture::{
    CaptureBuffer, CaptureConfig, CaptureError, CaptureEvent, DumpSession, SerialConfig,
};

pub use memdump_export::{CsvOptions, ExportError, export_csv, write_csv};
