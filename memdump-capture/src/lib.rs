//! # memdump capture
//!
//! The byte-supplier side of a memory dump: an append-only
//! [`CaptureBuffer`] and a [`DumpSession`] that speaks the request and
//! acknowledge handshake over any async byte stream (a serial port, a
//! TCP bridge, or an in-memory pipe in tests).

pub mod buffer;
pub mod error;
pub mod protocol;
pub mod serial;
pub mod session;

pub use buffer::CaptureBuffer;
pub use error::{CaptureError, Result};
pub use protocol::Command;
pub use serial::{PortSummary, SerialConfig, list_ports};
pub use session::{CaptureConfig, CaptureEvent, DumpSession};
