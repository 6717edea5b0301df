//! # TSPL Protocol Implementation
//!
//! Command builders for the TSPL language used by TSC thermal label
//! printers, and the per-job command sequence.
//!
//! ## Module Structure
//!
//! - [`commands`]: Individual command lines and the configuration block
//! - [`sequence`]: The ordered [`PrintSequence`] for one label
//!
//! ## Usage Example
//!
//! ```
//! use labelpress::printer::{LabelProfile, LabelSettings};
//! use labelpress::protocol::{Command, PrintSequence};
//!
//! let sequence = PrintSequence::build(&LabelSettings::default(), LabelProfile::Primary);
//!
//! assert_eq!(sequence.steps()[0], Command::ClearBuffer);
//! assert_eq!(sequence.to_lines().last().unwrap(), "PRINT 1,1");
//! ```
//!
//! ## Protocol Reference
//!
//! Based on the "TSPL/TSPL2 Programming Manual" by TSC Auto ID Technology.

pub mod commands;
pub mod sequence;

pub use sequence::{Command, PrintSequence};
