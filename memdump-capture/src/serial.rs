//! Serial port link to the logging device.
//!
//! The device talks 8N1 without flow control. A [`SerialStream`] is an
//! ordinary async byte stream and can be handed straight to
//! [`crate::DumpSession`].

use tokio_serial::{
    DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialPortType, SerialStream, StopBits,
};

use crate::error::Result;

/// Baud rate of the logging device.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Port settings for a serial dump link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Port path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub path: String,
    /// Line speed in baud.
    pub baud_rate: u32,
}

impl SerialConfig {
    /// Creates an 8N1 configuration for `path` at [`DEFAULT_BAUD_RATE`].
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Opens the port for async IO.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns `CaptureError::Serial` if the port cannot be opened or
    /// configured.
    pub fn open(&self) -> Result<SerialStream> {
        let stream = tokio_serial::new(self.path.as_str(), self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()?;
        tracing::info!("Opened {} at {} baud (8N1)", self.path, self.baud_rate);
        Ok(stream)
    }
}

/// A serial port present on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    /// Port path.
    pub name: String,
    /// Short description of the adapter.
    pub description: String,
}

/// Lists the serial ports present on this machine.
///
/// # Errors
/// Returns `CaptureError::Serial` if the ports cannot be enumerated.
pub fn list_ports() -> Result<Vec<PortSummary>> {
    let ports = tokio_serial::available_ports()?;
    Ok(ports
        .into_iter()
        .map(|port| PortSummary {
            description: describe(&port.port_type),
            name: port.port_name,
        })
        .collect())
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let mut text = format!("USB {:04x}:{:04x}", usb.vid, usb.pid);
            for part in [&usb.manufacturer, &usb.product].into_iter().flatten() {
                text.push(' ');
                text.push_str(part);
            }
            text
        }
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "unknown".to_string(),
    }
}
