//! # Printer Transport Layer
//!
//! This module provides the device channel abstraction print jobs are sent
//! through, its adapters, and the dispatcher that drives a job.
//!
//! ## Available Channels
//!
//! - [`port`]: Writes TSPL to a device file (`/dev/usb/lp0`, `/dev/rfcomm0`, ...)
//! - [`memory`]: Records every call; used for dry runs and tests
//!
//! ## Dispatch
//!
//! [`dispatch::dispatch`] walks a [`PrintSequence`](crate::protocol::PrintSequence)
//! through a channel and guarantees the channel is closed on failure.

pub mod dispatch;
pub mod memory;
pub mod port;

pub use dispatch::{DispatchOutcome, JobState, dispatch};
pub use memory::{ChannelCall, MemoryChannel};
pub use port::PortChannel;

use std::path::Path;

use crate::error::LabelError;
use crate::protocol::commands::CLEAR_BUFFER;

/// Capability to talk to one label printer at a time.
///
/// A channel is opened per job and closed at the end of it. Adapters report
/// their own failures as [`LabelError::Transport`]; the dispatcher maps
/// them onto the job-level error.
pub trait DeviceChannel: Send {
    /// Open a connection to the printer called `printer`.
    fn open(&mut self, printer: &str) -> Result<(), LabelError>;

    /// Send one command line (without terminator).
    fn send(&mut self, command: &str) -> Result<(), LabelError>;

    /// Upload the image file at `path`, stored on the printer as `name`.
    fn upload_image(&mut self, path: &Path, name: &str) -> Result<(), LabelError>;

    /// Close the connection. Closing an unopened channel is a no-op.
    fn close(&mut self) -> Result<(), LabelError>;

    /// Clear the printer's image buffer.
    fn clear_buffer(&mut self) -> Result<(), LabelError> {
        self.send(CLEAR_BUFFER)
    }
}
