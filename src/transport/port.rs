//! # Device File Transport
//!
//! Sends TSPL to a printer exposed as a device file: a USB printer class
//! device (`/dev/usb/lp0`), a bound RFCOMM port (`/dev/rfcomm0`) or a
//! serial adapter.
//!
//! ## Printer Names
//!
//! Jobs address printers by name (`"TSC TE310-packaging"`). Names are
//! mapped to device paths with [`PortChannel::with_device`]; a name with
//! no mapping is opened as a path itself.
//!
//! ## Wire Format
//!
//! ```text
//! <command>\r\n                          one per command
//! DOWNLOAD "<name>",<len>,<bytes>\r\n    image upload
//! ```
//!
//! ## Chunked Writes
//!
//! Large blocks (the image upload) are written in chunks with a small
//! delay between them so slow links do not overflow.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info};

use super::DeviceChannel;
use crate::error::LabelError;

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

const LINE_END: &[u8] = b"\r\n";

/// # Device File Channel
///
/// ## Example
///
/// ```no_run
/// use labelpress::transport::{DeviceChannel, PortChannel};
///
/// let mut channel = PortChannel::new().with_device("TSC TE310-packaging", "/dev/usb/lp0");
/// channel.open("TSC TE310-packaging")?;
/// channel.send("SELFTEST")?;
/// channel.close()?;
///
/// # Ok::<(), labelpress::error::LabelError>(())
/// ```
pub struct PortChannel {
    devices: HashMap<String, PathBuf>,
    file: Option<File>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl Default for PortChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PortChannel {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
            file: None,
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
        }
    }

    /// Route jobs for `printer` to the device file at `path`.
    pub fn with_device(mut self, printer: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.devices.insert(printer.into(), path.into());
        self
    }

    /// Set the chunk size for large writes. Default is 4096 bytes.
    pub fn set_chunk_size(&mut self, size: usize) {
        self.chunk_size = size.max(1);
    }

    /// Set the delay between chunks. Default is 2ms.
    pub fn set_chunk_delay(&mut self, delay: Duration) {
        self.chunk_delay = delay;
    }

    /// Device path a printer name resolves to.
    pub fn device_for(&self, printer: &str) -> PathBuf {
        self.devices
            .get(printer)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(printer))
    }

    fn file(&mut self) -> Result<&mut File, LabelError> {
        self.file
            .as_mut()
            .ok_or_else(|| LabelError::Transport("channel is not open".to_string()))
    }

    fn write_block(&mut self, data: &[u8]) -> Result<(), LabelError> {
        let chunk_size = self.chunk_size;
        let chunk_delay = self.chunk_delay;
        let file = self.file()?;

        if data.len() <= chunk_size {
            file.write_all(data)
                .map_err(|e| LabelError::Transport(format!("Write failed: {}", e)))?;
        } else {
            for chunk in data.chunks(chunk_size) {
                file.write_all(chunk)
                    .map_err(|e| LabelError::Transport(format!("Write failed: {}", e)))?;

                if !chunk_delay.is_zero() {
                    thread::sleep(chunk_delay);
                }
            }
        }

        file.flush()
            .map_err(|e| LabelError::Transport(format!("Flush failed: {}", e)))
    }
}

/// Wire bytes for uploading `image` as `name`.
pub fn download_frame(name: &str, image: &[u8]) -> Vec<u8> {
    let header = format!("DOWNLOAD \"{}\",{},", name, image.len());
    let mut frame = Vec::with_capacity(header.len() + image.len() + LINE_END.len());
    frame.extend_from_slice(header.as_bytes());
    frame.extend_from_slice(image);
    frame.extend_from_slice(LINE_END);
    frame
}

impl DeviceChannel for PortChannel {
    fn open(&mut self, printer: &str) -> Result<(), LabelError> {
        let path = self.device_for(printer);
        let file = OpenOptions::new().write(true).open(&path).map_err(|e| {
            LabelError::Transport(format!("Failed to open {}: {}", path.display(), e))
        })?;
        info!("Opened '{}' at {}", printer, path.display());
        self.file = Some(file);
        Ok(())
    }

    fn send(&mut self, command: &str) -> Result<(), LabelError> {
        debug!("→ {}", command);
        let mut line = Vec::with_capacity(command.len() + LINE_END.len());
        line.extend_from_slice(command.as_bytes());
        line.extend_from_slice(LINE_END);
        self.write_block(&line)
    }

    fn upload_image(&mut self, path: &Path, name: &str) -> Result<(), LabelError> {
        let image = fs::read(path).map_err(|e| {
            LabelError::Transport(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!("→ DOWNLOAD \"{}\" ({} bytes)", name, image.len());
        self.write_block(&download_frame(name, &image))
    }

    fn close(&mut self) -> Result<(), LabelError> {
        if let Some(mut file) = self.file.take() {
            file.flush()
                .map_err(|e| LabelError::Transport(format!("Flush failed: {}", e)))?;
        }
        Ok(())
    }
}
