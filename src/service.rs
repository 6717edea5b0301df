//! # Print Service
//!
//! Ties the pipeline together for one process: a settings store, a
//! renderer and the device channel.
//!
//! ## Job Flow
//!
//! ```text
//! lock channel ─► snapshot settings ─► render ─► BMP temp file
//!                                                    │
//!             unlock ◄─ delete temp file ◄─ dispatch ◄┘
//! ```
//!
//! The channel lock is held for the whole job, so at most one job talks to
//! the printers at a time. Settings updates made while a job runs are
//! picked up by the next job.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use log::info;

use crate::error::LabelError;
use crate::label::LabelElements;
use crate::printer::{LabelProfile, LabelSettings, SettingsStore};
use crate::protocol::PrintSequence;
use crate::render::{LabelRenderer, RenderReport, RenderedLabel};
use crate::transport::{DeviceChannel, DispatchOutcome, dispatch};

/// Summary of one dispatched label.
#[derive(Debug, Clone)]
pub struct PrintReceipt {
    pub profile: LabelProfile,
    pub printer: String,
    pub report: RenderReport,
    pub sequence: PrintSequence,
    pub outcome: DispatchOutcome,
}

pub struct LabelService<C: DeviceChannel> {
    settings: SettingsStore,
    renderer: LabelRenderer,
    channel: Mutex<C>,
}

impl<C: DeviceChannel> LabelService<C> {
    pub fn new(settings: LabelSettings, renderer: LabelRenderer, channel: C) -> Self {
        Self {
            settings: SettingsStore::new(settings),
            renderer,
            channel: Mutex::new(channel),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Render without printing, using the current settings.
    pub fn preview(
        &self,
        elements: &LabelElements,
        profile: LabelProfile,
    ) -> Result<RenderedLabel, LabelError> {
        self.renderer
            .render(elements, profile, &self.settings.snapshot())
    }

    /// Render `elements` for `profile` and send the label to its printer.
    pub fn print(
        &self,
        elements: &LabelElements,
        profile: LabelProfile,
    ) -> Result<PrintReceipt, LabelError> {
        let mut channel = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
        let settings = self.settings.snapshot();
        self.run_job(&mut *channel, &settings, elements, profile)
    }

    /// Print the same elements on the primary then the secondary profile,
    /// stopping at the first failure.
    pub fn print_all(&self, elements: &LabelElements) -> Result<Vec<PrintReceipt>, LabelError> {
        let mut channel = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
        let settings = self.settings.snapshot();

        [LabelProfile::Primary, LabelProfile::Secondary]
            .into_iter()
            .map(|profile| self.run_job(&mut *channel, &settings, elements, profile))
            .collect()
    }

    /// Take the channel back, e.g. to inspect a recording channel.
    pub fn into_channel(self) -> C {
        self.channel
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn run_job(
        &self,
        channel: &mut C,
        settings: &LabelSettings,
        elements: &LabelElements,
        profile: LabelProfile,
    ) -> Result<PrintReceipt, LabelError> {
        let printer = settings.printer_name(profile).to_string();
        info!("Print job for {} label on '{}'", profile, printer);

        let label = self.renderer.render(elements, profile, settings)?;

        let mut image = tempfile::Builder::new()
            .prefix("label-")
            .suffix(".bmp")
            .tempfile()?;
        image.write_all(&label.raster.to_bmp())?;
        image.flush()?;

        let sequence = PrintSequence::build(settings, profile);
        let outcome = dispatch(
            channel,
            &sequence,
            &printer,
            image.path(),
            settings.is_app_development_mode,
        )?;

        Ok(PrintReceipt {
            profile,
            printer,
            report: label.report,
            sequence,
            outcome,
        })
    }
}
