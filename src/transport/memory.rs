//! In-memory device channel.

use std::fs;
use std::path::Path;

use log::debug;

use super::DeviceChannel;
use crate::error::LabelError;

/// One call made on a [`MemoryChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    Open(String),
    Send(String),
    /// Image name and the number of bytes read from the file.
    Upload { name: String, len: usize },
    Close,
}

/// A channel that records calls instead of talking to hardware.
///
/// `fail_at(n)` makes the n-th call (0-based, counting every method) fail
/// with a transport error. The failing call is still recorded.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    calls: Vec<ChannelCall>,
    fail_at: Option<usize>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(mut self, call_index: usize) -> Self {
        self.fail_at = Some(call_index);
        self
    }

    pub fn calls(&self) -> &[ChannelCall] {
        &self.calls
    }

    /// Command lines sent so far, in order.
    pub fn sent(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ChannelCall::Send(line) => Some(line.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: ChannelCall) -> Result<(), LabelError> {
        debug!("Memory channel: {:?}", call);
        let index = self.calls.len();
        self.calls.push(call);
        if self.fail_at == Some(index) {
            return Err(LabelError::Transport(format!("injected failure at call {}", index)));
        }
        Ok(())
    }
}

impl DeviceChannel for MemoryChannel {
    fn open(&mut self, printer: &str) -> Result<(), LabelError> {
        self.record(ChannelCall::Open(printer.to_string()))
    }

    fn send(&mut self, command: &str) -> Result<(), LabelError> {
        self.record(ChannelCall::Send(command.to_string()))
    }

    fn upload_image(&mut self, path: &Path, name: &str) -> Result<(), LabelError> {
        let len = fs::read(path)
            .map_err(|e| LabelError::Transport(format!("Failed to read {}: {}", path.display(), e)))?
            .len();
        self.record(ChannelCall::Upload {
            name: name.to_string(),
            len,
        })
    }

    fn close(&mut self) -> Result<(), LabelError> {
        self.record(ChannelCall::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls() {
        let mut channel = MemoryChannel::new();
        channel.open("P1").unwrap();
        channel.clear_buffer().unwrap();
        channel.send("PRINT 1,1").unwrap();
        channel.close().unwrap();

        assert_eq!(
            channel.calls(),
            &[
                ChannelCall::Open("P1".to_string()),
                ChannelCall::Send("CLS".to_string()),
                ChannelCall::Send("PRINT 1,1".to_string()),
                ChannelCall::Close,
            ]
        );
        assert_eq!(channel.sent(), vec!["CLS", "PRINT 1,1"]);
    }

    #[test]
    fn test_injected_failure() {
        let mut channel = MemoryChannel::new().fail_at(1);
        assert!(channel.open("P1").is_ok());
        assert!(matches!(channel.send("X"), Err(LabelError::Transport(_))));
        assert!(channel.send("Y").is_ok());
        assert_eq!(channel.calls().len(), 3);
    }

    #[test]
    fn test_upload_reads_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), [0u8; 62]).unwrap();

        let mut channel = MemoryChannel::new();
        channel.upload_image(file.path(), "label.bmp").unwrap();
        assert_eq!(
            channel.calls(),
            &[ChannelCall::Upload {
                name: "label.bmp".to_string(),
                len: 62
            }]
        );
    }
}
