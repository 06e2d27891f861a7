//! Host-to-device command bytes and link defaults.
//!
//! The host starts a dump with a single request byte. The device then
//! streams the frame in chunks and waits for an acknowledge byte after
//! each chunk before sending the next one.

use std::time::Duration;

/// Memory size of the logging device: 32 MiB.
pub const DEFAULT_MEMORY_CAPACITY: usize = 33_554_432;

/// Quiet period after which a transfer is considered paused and the
/// buffer is decoded.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(1);

/// Read size for a single chunk from the link.
pub const DEFAULT_READ_CHUNK: usize = 4096;

/// A single-byte command sent from host to device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask the device to start dumping its memory.
    RequestDump,
    /// Acknowledge a received chunk so the device sends the next one.
    Acknowledge,
}

impl Command {
    /// Returns the byte sent on the wire.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::RequestDump => b'A',
            Self::Acknowledge => b'B',
        }
    }

    /// Parses a command byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Self::RequestDump),
            b'B' => Some(Self::Acknowledge),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bytes() {
        assert_eq!(Command::RequestDump.as_byte(), b'A');
        assert_eq!(Command::Acknowledge.as_byte(), b'B');
        assert_eq!(Command::from_byte(b'B'), Some(Command::Acknowledge));
        assert_eq!(Command::from_byte(b'Z'), None);
    }
}
