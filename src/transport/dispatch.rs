//! # Print Job Dispatch
//!
//! Drives one [`PrintSequence`] through a [`DeviceChannel`].
//!
//! ## Job States
//!
//! ```text
//! Idle ──open──► Opened ──config──► Configured ──upload──► ImageUploaded
//!                                                              │
//!                                          Closed ◄──close── Printed
//! ```
//!
//! | Failure | Channel calls after it | Error |
//! |---------|------------------------|-------|
//! | `open` | none | `DeviceOpen` |
//! | any later call | best-effort `close` | `DeviceCommand { stage }` |
//!
//! `stage` names the last state the job reached. The adapter's own error
//! is logged, not returned.
//!
//! In development mode nothing is sent: the sequence is logged and the job
//! reports [`DispatchOutcome::Suppressed`].

use std::fmt;
use std::path::Path;

use log::{debug, error, info, warn};

use super::DeviceChannel;
use crate::error::LabelError;
use crate::protocol::{Command, PrintSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Opened,
    Configured,
    ImageUploaded,
    Printed,
    Closed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Opened => "opened",
            Self::Configured => "configured",
            Self::ImageUploaded => "image_uploaded",
            Self::Printed => "printed",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a dispatched job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every command reached the printer and the channel was closed.
    Printed,
    /// Development mode: nothing was sent.
    Suppressed,
}

/// Send `sequence` to `printer`, uploading the BMP at `image`.
pub fn dispatch<C: DeviceChannel + ?Sized>(
    channel: &mut C,
    sequence: &PrintSequence,
    printer: &str,
    image: &Path,
    development_mode: bool,
) -> Result<DispatchOutcome, LabelError> {
    if development_mode {
        info!("Development mode: not sending {} commands to '{}'", sequence.steps().len(), printer);
        for line in sequence.to_lines() {
            debug!("  {}", line);
        }
        return Ok(DispatchOutcome::Suppressed);
    }

    if let Err(e) = channel.open(printer) {
        error!("Opening '{}' failed: {}", printer, e);
        return Err(LabelError::DeviceOpen {
            printer: printer.to_string(),
        });
    }

    let mut state = JobState::Opened;
    for step in sequence.steps() {
        let result = match step {
            Command::ClearBuffer => channel.clear_buffer(),
            Command::Send(line) => channel.send(line),
            Command::UploadImage { name } => channel.upload_image(image, name),
        };

        if let Err(e) = result {
            error!("'{}' failed at {:?} in state {}: {}", printer, step, state, e);
            abort(channel, printer);
            return Err(LabelError::DeviceCommand {
                stage: state.as_str(),
            });
        }

        state = next_state(state, step);
    }
    state = JobState::Printed;

    if let Err(e) = channel.close() {
        error!("Closing '{}' failed: {}", printer, e);
        return Err(LabelError::DeviceCommand {
            stage: state.as_str(),
        });
    }

    info!("Label sent to '{}'", printer);
    Ok(DispatchOutcome::Printed)
}

fn next_state(state: JobState, step: &Command) -> JobState {
    match (state, step) {
        (_, Command::UploadImage { .. }) => JobState::ImageUploaded,
        (JobState::Opened, Command::Send(_)) => JobState::Configured,
        (current, _) => current,
    }
}

fn abort<C: DeviceChannel + ?Sized>(channel: &mut C, printer: &str) {
    if let Err(e) = channel.close() {
        warn!("Closing '{}' after failure also failed: {}", printer, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{LabelProfile, LabelSettings};
    use crate::transport::{ChannelCall, MemoryChannel};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::NamedTempFile;

    fn fixture() -> (PrintSequence, NamedTempFile) {
        let sequence = PrintSequence::build(&LabelSettings::default(), LabelProfile::Primary);
        let image = NamedTempFile::new().unwrap();
        fs::write(image.path(), b"BM").unwrap();
        (sequence, image)
    }

    #[test]
    fn test_full_dispatch() {
        let (sequence, image) = fixture();
        let mut channel = MemoryChannel::new();

        let outcome = dispatch(&mut channel, &sequence, "P1", image.path(), false).unwrap();
        assert_eq!(outcome, DispatchOutcome::Printed);

        let calls = channel.calls();
        assert_eq!(calls.first(), Some(&ChannelCall::Open("P1".to_string())));
        assert_eq!(calls.last(), Some(&ChannelCall::Close));
        assert_eq!(calls[1], ChannelCall::Send("CLS".to_string()));
        assert_eq!(
            calls[10],
            ChannelCall::Upload {
                name: "label.bmp".to_string(),
                len: 2
            }
        );
        // open + 12 steps + close
        assert_eq!(calls.len(), 14);
    }

    #[test]
    fn test_development_mode_makes_no_calls() {
        let (sequence, image) = fixture();
        let mut channel = MemoryChannel::new();

        let outcome = dispatch(&mut channel, &sequence, "P1", image.path(), true).unwrap();
        assert_eq!(outcome, DispatchOutcome::Suppressed);
        assert!(channel.calls().is_empty());
    }

    #[test]
    fn test_open_failure_sends_nothing() {
        let (sequence, image) = fixture();
        let mut channel = MemoryChannel::new().fail_at(0);

        let err = dispatch(&mut channel, &sequence, "P1", image.path(), false).unwrap_err();
        assert!(matches!(err, LabelError::DeviceOpen { ref printer } if printer == "P1"));
        assert_eq!(channel.calls(), &[ChannelCall::Open("P1".to_string())]);
    }

    #[test]
    fn test_failure_mid_configuration_closes() {
        let (sequence, image) = fixture();
        // 0 open, 1 CLS, 2 DIRECTION, 3 DENSITY
        let mut channel = MemoryChannel::new().fail_at(3);

        let err = dispatch(&mut channel, &sequence, "P1", image.path(), false).unwrap_err();
        assert!(matches!(err, LabelError::DeviceCommand { stage: "configured" }));
        assert_eq!(channel.calls().len(), 5);
        assert_eq!(channel.calls().last(), Some(&ChannelCall::Close));
    }

    #[test]
    fn test_failure_on_clear_buffer_reports_opened() {
        let (sequence, image) = fixture();
        let mut channel = MemoryChannel::new().fail_at(1);

        let err = dispatch(&mut channel, &sequence, "P1", image.path(), false).unwrap_err();
        assert!(matches!(err, LabelError::DeviceCommand { stage: "opened" }));
        assert_eq!(channel.calls().last(), Some(&ChannelCall::Close));
    }

    #[test]
    fn test_failure_after_upload() {
        let (sequence, image) = fixture();
        // 10 upload, 11 PUTBMP
        let mut channel = MemoryChannel::new().fail_at(11);

        let err = dispatch(&mut channel, &sequence, "P1", image.path(), false).unwrap_err();
        assert!(matches!(err, LabelError::DeviceCommand { stage: "image_uploaded" }));
        assert_eq!(channel.calls().last(), Some(&ChannelCall::Close));
    }

    #[test]
    fn test_close_failure_after_print() {
        let (sequence, image) = fixture();
        let mut channel = MemoryChannel::new().fail_at(13);

        let err = dispatch(&mut channel, &sequence, "P1", image.path(), false).unwrap_err();
        assert!(matches!(err, LabelError::DeviceCommand { stage: "printed" }));
        assert_eq!(channel.calls().len(), 14);
    }
}
