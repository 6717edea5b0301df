//! Ordered command list for one print job.

use std::fmt;

use super::commands::{self, CLEAR_BUFFER, IMAGE_NAME};
use crate::printer::{LabelProfile, LabelSettings};

/// One step of a print job as seen by the device channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A single TSPL command line.
    Send(String),
    /// Clear the printer's image buffer.
    ClearBuffer,
    /// Upload the rendered bitmap under `name`.
    UploadImage { name: String },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(line) => write!(f, "{}", line),
            Self::ClearBuffer => write!(f, "{}", CLEAR_BUFFER),
            Self::UploadImage { name } => write!(f, "<upload {}>", name),
        }
    }
}

/// The full command sequence for printing one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSequence {
    steps: Vec<Command>,
}

impl PrintSequence {
    /// Build the sequence for `profile` from a settings snapshot.
    ///
    /// ```text
    /// ClearBuffer
    /// DIRECTION .. SHIFT        (configuration block)
    /// UploadImage "label.bmp"
    /// PUTBMP 0,0,"label.bmp",8,80
    /// PRINT 1,1
    /// ```
    pub fn build(settings: &LabelSettings, profile: LabelProfile) -> Self {
        let mut steps = vec![Command::ClearBuffer];
        steps.extend(
            commands::configuration(settings, profile)
                .into_iter()
                .map(Command::Send),
        );
        steps.push(Command::UploadImage {
            name: IMAGE_NAME.to_string(),
        });
        steps.push(Command::Send(commands::put_bitmap(IMAGE_NAME)));
        steps.push(Command::Send(commands::print()));
        Self { steps }
    }

    pub fn steps(&self) -> &[Command] {
        &self.steps
    }

    /// Name of the image the sequence uploads and places.
    pub fn image_name(&self) -> &str {
        self.steps
            .iter()
            .find_map(|step| match step {
                Command::UploadImage { name } => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or(IMAGE_NAME)
    }

    /// One display line per step.
    pub fn to_lines(&self) -> Vec<String> {
        self.steps.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::Orientation;
    use pretty_assertions::assert_eq;

    fn send(s: &str) -> Command {
        Command::Send(s.to_string())
    }

    #[test]
    fn test_reference_sequence() {
        let sequence = PrintSequence::build(&LabelSettings::default(), LabelProfile::Primary);
        assert_eq!(
            sequence.steps(),
            &[
                Command::ClearBuffer,
                send("DIRECTION 1"),
                send("DENSITY 12"),
                send("SPEED 4"),
                send("SIZE 100 mm, 100 mm"),
                send("GAP 3.048 mm, 0 mm"),
                send("TEAR ON"),
                send("AUTO CALIBRATION"),
                send("SHIFT -2.032 mm"),
                Command::UploadImage {
                    name: "label.bmp".to_string()
                },
                send("PUTBMP 0,0,\"label.bmp\",8,80"),
                send("PRINT 1,1"),
            ]
        );
        assert_eq!(sequence.image_name(), "label.bmp");
    }

    #[test]
    fn test_landscape_tear_off() {
        let settings = LabelSettings {
            orientation: Orientation::Landscape,
            tear_off: false,
            ..LabelSettings::default()
        };
        let lines = PrintSequence::build(&settings, LabelProfile::Primary).to_lines();
        assert_eq!(lines[0], "CLS");
        assert_eq!(lines[1], "DIRECTION 0");
        assert_eq!(lines[6], "TEAR OFF");
        assert_eq!(lines[9], "<upload label.bmp>");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_profiles_differ_only_in_size() {
        let settings = LabelSettings {
            secondary_label_width: 58.0,
            ..LabelSettings::default()
        };
        let primary = PrintSequence::build(&settings, LabelProfile::Primary).to_lines();
        let secondary = PrintSequence::build(&settings, LabelProfile::Secondary).to_lines();

        let differing: Vec<usize> = (0..primary.len())
            .filter(|&i| primary[i] != secondary[i])
            .collect();
        assert_eq!(differing, vec![4]);
        assert_eq!(secondary[4], "SIZE 58 mm, 58 mm");
    }
}
