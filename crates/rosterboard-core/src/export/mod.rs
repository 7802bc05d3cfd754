//! Board export: snapshot, rasterize, then share or hand back for preview.
//!
//! The bitmap rendering itself sits behind [`BoardRasterizer`] and platform
//! sharing behind [`ShareTarget`]; [`Exporter`] only orchestrates them:
//!
//! 1. wait a short settle delay
//! 2. render a fixed 1280x960 logical layout on the blocking pool
//! 3. offer the image to the share target, if one accepts it
//! 4. otherwise return the image so the caller can preview/save it
//!
//! Render failures are returned as [`ExportOutcome::Failed`] so callers can
//! surface them instead of dropping them.

pub mod layout;
pub mod rasterizer;
pub mod share;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::fte;
use crate::models::{StaffDirectory, StaffMember};
use crate::roster::RosterState;

pub use layout::BoardLayout;
pub use rasterizer::TinySkiaRasterizer;
pub use share::{ExportFile, ShareError, ShareRequest, ShareTarget};

// ============================================================================
// Constants
// ============================================================================

/// Logical width of the exported board, independent of the terminal size.
pub const EXPORT_WIDTH: u32 = 1280;

/// Logical height of the exported board (4:3).
pub const EXPORT_HEIGHT: u32 = 960;

/// Pause before rendering so the front end can redraw without selection.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

pub const SHARE_TITLE: &str = "Daily Staff Roster";
pub const SHARE_TEXT: &str = "Here is today's roster.";

// ============================================================================
// Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),

    #[error("Failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("Failed to load font: {0}")]
    Font(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Export task failed: {0}")]
    Task(String),

    #[error("Failed to save export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Options handed to the rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Lossy encoder quality in `0.0..=1.0`; ignored by lossless encoders.
    pub quality: f32,
    pub background: Rgb,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f32,
}

impl ExportOptions {
    pub fn validate(&self) -> Result<(), ExportError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(ExportError::InvalidOptions(format!(
                "quality {} is outside 0.0..=1.0",
                self.quality
            )));
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(ExportError::InvalidOptions(format!(
                "pixel ratio {} must be a positive number",
                self.pixel_ratio
            )));
        }
        Ok(())
    }

    /// Canvas size in device pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let scale = |logical: u32| ((logical as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(EXPORT_WIDTH), scale(EXPORT_HEIGHT))
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: 0.95,
            background: Rgb::WHITE,
            pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// An encoded board image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ExportArtifact {
    pub fn file_name(&self, date: NaiveDate) -> String {
        export_file_name(date, self.format)
    }
}

/// Everything the rasterizer needs, captured when the export starts.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub staff: Vec<StaffMember>,
    pub roster: RosterState,
    pub physio_placements: usize,
    pub physio_fte: f64,
}

impl BoardSnapshot {
    pub fn capture(directory: &StaffDirectory, roster: &RosterState) -> Self {
        Self {
            staff: directory.members().to_vec(),
            roster: roster.clone(),
            physio_placements: fte::physio_placements(roster, directory),
            physio_fte: fte::physio_fte(roster, directory),
        }
    }

    pub fn staff_member(&self, id: &str) -> Option<&StaffMember> {
        self.staff.iter().find(|m| m.id == id)
    }
}

/// Renders a board snapshot to an encoded image.
pub trait BoardRasterizer: Send + Sync {
    fn render(
        &self,
        snapshot: &BoardSnapshot,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError>;
}

// ============================================================================
// Saving
// ============================================================================

/// `roster-<YYYY-MM-DD>.<ext>`
pub fn export_file_name(date: NaiveDate, format: ImageFormat) -> String {
    format!("roster-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Write the artifact into `dir` under its dated file name.
pub fn save_artifact(
    dir: &Path,
    artifact: &ExportArtifact,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(artifact.file_name(date));
    std::fs::write(&path, &artifact.bytes)?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "Saved roster image");
    Ok(path)
}

// ============================================================================
// Orchestration
// ============================================================================

#[derive(Debug)]
pub enum ExportOutcome {
    /// The share target took the image; nothing left to show.
    Shared,
    /// No share happened; the caller should offer the image for saving.
    Preview(ExportArtifact),
    Failed(ExportError),
}

#[derive(Clone)]
pub struct Exporter {
    rasterizer: Arc<dyn BoardRasterizer>,
    share_target: Option<Arc<dyn ShareTarget>>,
    options: ExportOptions,
    settle_delay: Duration,
}

impl Exporter {
    pub fn new(rasterizer: Arc<dyn BoardRasterizer>) -> Self {
        Self {
            rasterizer,
            share_target: None,
            options: ExportOptions::default(),
            settle_delay: SETTLE_DELAY,
        }
    }

    pub fn with_share_target(mut self, target: Arc<dyn ShareTarget>) -> Self {
        self.share_target = Some(target);
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn has_share_target(&self) -> bool {
        self.share_target.is_some()
    }

    /// Render `snapshot` and deliver it. `date` names the shared file.
    pub async fn run(&self, snapshot: BoardSnapshot, date: NaiveDate) -> ExportOutcome {
        tokio::time::sleep(self.settle_delay).await;

        let rasterizer = Arc::clone(&self.rasterizer);
        let options = self.options.clone();
        let rendered =
            tokio::task::spawn_blocking(move || rasterizer.render(&snapshot, &options)).await;

        let artifact = match rendered {
            Ok(Ok(artifact)) => artifact,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to render roster image");
                return ExportOutcome::Failed(e);
            }
            Err(e) => {
                error!(error = %e, "Render task panicked or was cancelled");
                return ExportOutcome::Failed(ExportError::Task(e.to_string()));
            }
        };
        info!(
            bytes = artifact.bytes.len(),
            width = artifact.width,
            height = artifact.height,
            "Rendered roster image"
        );

        if let Some(target) = &self.share_target {
            let request = ShareRequest::for_artifact(&artifact, date);
            if target.can_share(&request.files) {
                let target = Arc::clone(target);
                match tokio::task::spawn_blocking(move || target.share(&request)).await {
                    Ok(Ok(())) => {
                        info!("Roster image shared");
                        return ExportOutcome::Shared;
                    }
                    Ok(Err(e)) => {
                        info!(error = %e, "Share cancelled or failed, falling back to preview");
                    }
                    Err(e) => {
                        warn!(error = %e, "Share task panicked, falling back to preview");
                    }
                }
            } else {
                debug!("Share target cannot accept the roster image");
            }
        }

        ExportOutcome::Preview(artifact)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::CellId;

    struct FixedRasterizer;

    impl BoardRasterizer for FixedRasterizer {
        fn render(
            &self,
            snapshot: &BoardSnapshot,
            _options: &ExportOptions,
        ) -> Result<ExportArtifact, ExportError> {
            Ok(ExportArtifact {
                bytes: vec![snapshot.physio_placements as u8],
                format: ImageFormat::Jpeg,
                width: 4,
                height: 3,
            })
        }
    }

    struct FailingRasterizer;

    impl BoardRasterizer for FailingRasterizer {
        fn render(&self, _: &BoardSnapshot, _: &ExportOptions) -> Result<ExportArtifact, ExportError> {
            Err(ExportError::Encode("boom".to_string()))
        }
    }

    struct RecordingShare {
        accepts: bool,
        result: fn() -> Result<(), ShareError>,
        calls: AtomicUsize,
    }

    impl RecordingShare {
        fn new(accepts: bool, result: fn() -> Result<(), ShareError>) -> Arc<Self> {
            Arc::new(Self {
                accepts,
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ShareTarget for RecordingShare {
        fn can_share(&self, _files: &[ExportFile]) -> bool {
            self.accepts
        }

        fn share(&self, request: &ShareRequest) -> Result<(), ShareError> {
            assert_eq!(request.title, SHARE_TITLE);
            assert_eq!(request.files.len(), 1);
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn snapshot() -> BoardSnapshot {
        let directory = StaffDirectory::builtin();
        let mut roster = RosterState::new();
        roster.toggle("1st-T1_PTI".parse::<CellId>().unwrap(), "p1");
        BoardSnapshot::capture(&directory, &roster)
    }

    fn exporter(rasterizer: Arc<dyn BoardRasterizer>) -> Exporter {
        Exporter::new(rasterizer).with_settle_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_invalid_options_fail_the_export() {
        let options = ExportOptions {
            pixel_ratio: 0.0,
            ..ExportOptions::default()
        };
        let outcome = exporter(Arc::new(TinySkiaRasterizer::new()))
            .with_options(options)
            .run(snapshot(), date())
            .await;
        assert!(matches!(
            outcome,
            ExportOutcome::Failed(ExportError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(date(), ImageFormat::Jpeg), "roster-2026-10-18.jpg");
        assert_eq!(export_file_name(date(), ImageFormat::Png), "roster-2026-10-18.png");
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.quality, 0.95);
        assert_eq!(options.background, Rgb::WHITE);
        assert_eq!(options.pixel_ratio, 2.0);
        assert_eq!(options.canvas_size(), (2560, 1920));
    }

    #[test]
    fn test_options_validation() {
        let bad_ratio = ExportOptions {
            pixel_ratio: 0.0,
            ..ExportOptions::default()
        };
        assert!(matches!(bad_ratio.validate(), Err(ExportError::InvalidOptions(_))));

        let bad_quality = ExportOptions {
            quality: 1.5,
            ..ExportOptions::default()
        };
        assert!(matches!(bad_quality.validate(), Err(ExportError::InvalidOptions(_))));

        assert!(ExportOptions::default().validate().is_ok());
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rosterboard-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_save_artifact_writes_dated_file() {
        let dir = scratch_dir("save-artifact");
        let artifact = ExportArtifact {
            bytes: vec![1, 2, 3],
            format: ImageFormat::Jpeg,
            width: 1,
            height: 1,
        };
        let nested = dir.join("exports");
        let path = save_artifact(&nested, &artifact, date()).unwrap();
        assert_eq!(path, nested.join("roster-2026-10-18.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_without_share_target_returns_preview() {
        let outcome = exporter(Arc::new(FixedRasterizer)).run(snapshot(), date()).await;
        match outcome {
            ExportOutcome::Preview(artifact) => assert_eq!(artifact.bytes, vec![1]),
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_render_failure_is_reported() {
        let outcome = exporter(Arc::new(FailingRasterizer)).run(snapshot(), date()).await;
        assert!(matches!(outcome, ExportOutcome::Failed(ExportError::Encode(_))));
    }

    #[tokio::test]
    async fn test_accepted_share_ends_export() {
        let share = RecordingShare::new(true, || Ok(()));
        let outcome = exporter(Arc::new(FixedRasterizer))
            .with_share_target(share.clone())
            .run(snapshot(), date())
            .await;
        assert!(matches!(outcome, ExportOutcome::Shared));
        assert_eq!(share.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_share_falls_back_to_preview() {
        let share = RecordingShare::new(true, || Err(ShareError::Cancelled));
        let outcome = exporter(Arc::new(FixedRasterizer))
            .with_share_target(share.clone())
            .run(snapshot(), date())
            .await;
        assert!(matches!(outcome, ExportOutcome::Preview(_)));
        assert_eq!(share.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refusing_share_is_not_called() {
        let share = RecordingShare::new(false, || Ok(()));
        let outcome = exporter(Arc::new(FixedRasterizer))
            .with_share_target(share.clone())
            .run(snapshot(), date())
            .await;
        assert!(matches!(outcome, ExportOutcome::Preview(_)));
        assert_eq!(share.calls.load(Ordering::SeqCst), 0);
    }
}
