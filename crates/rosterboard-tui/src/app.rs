//! Application state management for the roster board TUI.
//!
//! This module contains the `App` struct that owns the board, the UI state
//! around it (focus, cursors, overlays) and the background export task.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rosterboard_core::export::{
    self, ExportArtifact, ExportOutcome, Exporter, TinySkiaRasterizer,
};
use rosterboard_core::{
    Board, CellId, ColumnId, PlacementError, PlacementOutcome, Session, StaffDirectory,
    StaffMember, StaffRole,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::share::CommandShareTarget;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the export result channel. Only one export runs at a time.
const CHANNEL_BUFFER_SIZE: usize = 4;

// ============================================================================
// UI State Types
// ============================================================================

/// Which panel receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Pool,
    Board,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    /// A placement was refused; the notice blocks until dismissed.
    ShowingNotice,
    ConfirmingReset,
    ConfirmingQuit,
    Exporting,
    ExportReady,
    ExportFailed,
    Quitting,
}

/// Cursor over the board. A `None` session means the column header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    pub session: Option<Session>,
    pub column: ColumnId,
}

impl BoardCursor {
    pub fn cell(&self) -> Option<CellId> {
        self.session.map(|session| CellId::new(session, self.column))
    }

    pub fn is_header(&self) -> bool {
        self.session.is_none()
    }

    pub fn up(&mut self) {
        self.session = match self.session {
            None | Some(Session::First) => None,
            Some(session) => Some(Session::ALL[session.index() - 1]),
        };
    }

    pub fn down(&mut self) {
        self.session = match self.session {
            None => Some(Session::First),
            Some(session) => Some(
                Session::ALL
                    .get(session.index() + 1)
                    .copied()
                    .unwrap_or(session),
            ),
        };
    }

    pub fn left(&mut self) {
        let index = self.column.index().saturating_sub(1);
        self.column = ColumnId::ALL[index];
    }

    pub fn right(&mut self) {
        let index = (self.column.index() + 1).min(ColumnId::ALL.len() - 1);
        self.column = ColumnId::ALL[index];
    }
}

impl Default for BoardCursor {
    fn default() -> Self {
        Self {
            session: Some(Session::First),
            column: ColumnId::T1PtI,
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub board: Board,

    // UI State
    pub state: AppState,
    pub focus: Focus,
    pub pool_selection: usize,
    pub cursor: BoardCursor,

    /// One-line feedback shown in the status bar
    pub status_message: Option<String>,
    /// Blocking notice text (validation rejections)
    pub notice: Option<String>,

    // Export state
    pub export_preview: Option<ExportArtifact>,
    pub export_error: Option<String>,
    pub export_dir: PathBuf,
    exporter: Exporter,
    export_tx: mpsc::Sender<ExportOutcome>,
    export_rx: mpsc::Receiver<ExportOutcome>,
}

impl App {
    /// Create the application from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let directory = config.staff_directory()?;
        let export_dir = config.export_dir();
        debug!(staff = directory.len(), export_dir = %export_dir.display(), "Config resolved");

        let mut exporter = Exporter::new(Arc::new(TinySkiaRasterizer::new()));
        if let Some(ref command) = config.share_command {
            match CommandShareTarget::from_command(command, export_dir.clone()) {
                Some(target) => exporter = exporter.with_share_target(Arc::new(target)),
                None => warn!("Ignoring empty share_command in config"),
            }
        }
        info!(share = exporter.has_share_target(), "Exporter ready");

        Ok(Self::with_exporter(directory, exporter, export_dir))
    }

    pub fn with_exporter(directory: StaffDirectory, exporter: Exporter, export_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        Self {
            board: Board::new(directory),
            state: AppState::Normal,
            focus: Focus::Pool,
            pool_selection: 0,
            cursor: BoardCursor::default(),
            status_message: None,
            notice: None,
            export_preview: None,
            export_error: None,
            export_dir,
            exporter,
            export_tx: tx,
            export_rx: rx,
        }
    }

    // =========================================================================
    // Staff pool
    // =========================================================================

    pub fn visible_staff(&self) -> Vec<&StaffMember> {
        self.board.visible_staff()
    }

    pub fn highlighted_staff(&self) -> Option<&StaffMember> {
        self.visible_staff().get(self.pool_selection).copied()
    }

    pub fn pool_up(&mut self) {
        self.pool_selection = self.pool_selection.saturating_sub(1);
    }

    pub fn pool_down(&mut self) {
        let len = self.visible_staff().len();
        if self.pool_selection + 1 < len {
            self.pool_selection += 1;
        }
    }

    /// Arm or disarm the highlighted staff member.
    pub fn select_highlighted(&mut self) {
        let Some(id) = self.highlighted_staff().map(|m| m.id.clone()) else {
            return;
        };
        if let Err(e) = self.board.select_staff(&id) {
            warn!(error = %e, "Failed to select staff member");
            self.status_message = Some(e.to_string());
            return;
        }
        self.status_message = None;
        if self.board.selection().is_armed(&id) {
            self.focus = Focus::Board;
        }
    }

    /// Switch the role tab. Always disarms.
    pub fn set_role_filter(&mut self, role: StaffRole) {
        self.board.set_role_filter(role);
        self.pool_selection = 0;
        self.focus = Focus::Pool;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Pool => Focus::Board,
            Focus::Board => Focus::Pool,
        };
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Place at the cursor: toggle in a cell, or stamp when on the header row.
    pub fn place_at_cursor(&mut self) {
        let result = match self.cursor.cell() {
            Some(cell) => self.board.place_in_cell(cell),
            None => self.board.stamp_column(self.cursor.column),
        };
        self.report_placement(result);
    }

    /// Stamp the armed staff member into every session of the cursor's column.
    pub fn stamp_cursor_column(&mut self) {
        let result = self.board.stamp_column(self.cursor.column);
        self.report_placement(result);
    }

    fn report_placement(&mut self, result: Result<PlacementOutcome, PlacementError>) {
        let name = self
            .board
            .armed_staff()
            .map(|m| m.name.clone())
            .unwrap_or_default();
        match result {
            Ok(PlacementOutcome::Assigned) => {
                self.status_message = Some(format!("{} assigned to {}", name, self.cursor_label()));
            }
            Ok(PlacementOutcome::Unassigned) => {
                self.status_message = Some(format!("{} removed from {}", name, self.cursor_label()));
            }
            Ok(PlacementOutcome::Stamped { added }) => {
                self.status_message = Some(format!(
                    "{} stamped into {} ({} new)",
                    name,
                    self.cursor.column.label(),
                    added
                ));
            }
            Err(PlacementError::Rejected(reason)) => {
                info!(reason = %reason, "Placement rejected");
                self.notice = Some(reason);
                self.state = AppState::ShowingNotice;
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
            }
        }
    }

    fn cursor_label(&self) -> String {
        match self.cursor.session {
            Some(session) => format!("{} {}", session, self.cursor.column.label()),
            None => self.cursor.column.label().to_string(),
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Reset
    // =========================================================================

    pub fn request_reset(&mut self) {
        self.state = AppState::ConfirmingReset;
    }

    pub fn confirm_reset(&mut self) {
        self.board.reset();
        self.state = AppState::Normal;
        self.status_message = Some("Board cleared".to_string());
    }

    // =========================================================================
    // Export
    // =========================================================================

    pub fn is_exporting(&self) -> bool {
        matches!(self.state, AppState::Exporting)
    }

    /// Snapshot the board and render it in the background.
    ///
    /// Ignored while an export is already running.
    pub fn start_export(&mut self) {
        if self.is_exporting() {
            return;
        }
        self.state = AppState::Exporting;
        self.export_preview = None;
        self.export_error = None;

        let snapshot = self.board.begin_export();
        let exporter = self.exporter.clone();
        let tx = self.export_tx.clone();
        let date = today();
        info!(placements = snapshot.roster.placements().count(), "Starting export");

        tokio::spawn(async move {
            let outcome = exporter.run(snapshot, date).await;
            if tx.send(outcome).await.is_err() {
                warn!("Export finished after the app stopped listening");
            }
        });
    }

    /// Drain finished exports. Called every tick of the event loop.
    pub fn check_background_tasks(&mut self) {
        while let Ok(outcome) = self.export_rx.try_recv() {
            self.process_export_outcome(outcome);
        }
    }

    fn process_export_outcome(&mut self, outcome: ExportOutcome) {
        match outcome {
            ExportOutcome::Shared => {
                self.state = AppState::Normal;
                self.status_message = Some("Roster shared".to_string());
            }
            ExportOutcome::Preview(artifact) => {
                self.export_preview = Some(artifact);
                self.state = AppState::ExportReady;
            }
            ExportOutcome::Failed(e) => {
                self.export_error = Some(e.to_string());
                self.state = AppState::ExportFailed;
            }
        }
    }

    /// File name the previewed image will be saved under.
    pub fn export_file_name(&self) -> Option<String> {
        self.export_preview.as_ref().map(|a| a.file_name(today()))
    }

    /// Save the previewed image to the export directory.
    pub fn save_export(&mut self) {
        let Some(ref artifact) = self.export_preview else {
            return;
        };
        match export::save_artifact(&self.export_dir, artifact, today()) {
            Ok(path) => {
                self.status_message = Some(format!("Saved {}", path.display()));
                self.export_preview = None;
                self.state = AppState::Normal;
            }
            Err(e) => {
                error!(error = %e, dir = %self.export_dir.display(), "Failed to save roster image");
                self.status_message = Some(format!("Save failed: {}", e));
            }
        }
    }

    pub fn dismiss_export(&mut self) {
        self.export_preview = None;
        self.export_error = None;
        self.state = AppState::Normal;
    }

    pub fn retry_export(&mut self) {
        self.dismiss_export();
        self.start_export();
    }
}

/// Date stamped into export file names, in UTC.
pub fn today() -> NaiveDate {
    export_date(Utc::now())
}

fn export_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rosterboard_core::export::{
        BoardRasterizer, BoardSnapshot, ExportError, ExportOptions, ImageFormat,
    };
    use rosterboard_core::validation::PT_IN_SUPPORT_COLUMN;

    struct FakeRasterizer {
        fail: bool,
    }

    impl BoardRasterizer for FakeRasterizer {
        fn render(
            &self,
            snapshot: &BoardSnapshot,
            _options: &ExportOptions,
        ) -> Result<ExportArtifact, ExportError> {
            if self.fail {
                return Err(ExportError::Encode("no canvas".to_string()));
            }
            Ok(ExportArtifact {
                bytes: vec![snapshot.physio_placements as u8; 4],
                format: ImageFormat::Jpeg,
                width: 2,
                height: 2,
            })
        }
    }

    fn app_with(fail: bool, export_dir: PathBuf) -> App {
        let exporter = Exporter::new(Arc::new(FakeRasterizer { fail }))
            .with_settle_delay(Duration::ZERO);
        App::with_exporter(StaffDirectory::builtin(), exporter, export_dir)
    }

    fn app() -> App {
        app_with(false, PathBuf::from("."))
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rosterboard-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    async fn wait_for_export(app: &mut App) {
        for _ in 0..200 {
            app.check_background_tasks();
            if !app.is_exporting() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("export did not finish");
    }

    // -------------------------------------------------------------------------
    // Cursor Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_cursor_moves_between_header_and_rows() {
        let mut cursor = BoardCursor::default();
        cursor.up();
        assert!(cursor.is_header());
        cursor.up();
        assert!(cursor.is_header());
        cursor.down();
        cursor.down();
        cursor.down();
        cursor.down();
        cursor.down();
        assert_eq!(cursor.session, Some(Session::Fourth));
    }

    #[test]
    fn test_cursor_clamps_columns() {
        let mut cursor = BoardCursor::default();
        cursor.left();
        assert_eq!(cursor.column, ColumnId::T1PtI);
        for _ in 0..10 {
            cursor.right();
        }
        assert_eq!(cursor.column, ColumnId::Pca);
        assert_eq!(cursor.cell().unwrap().to_string(), "1st-PCA");
    }

    // -------------------------------------------------------------------------
    // Placement Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_selecting_moves_focus_to_board() {
        let mut app = app();
        app.select_highlighted();
        assert!(app.board.selection().is_armed("p1"));
        assert_eq!(app.focus, Focus::Board);

        // Selecting again disarms and leaves focus alone
        app.focus = Focus::Pool;
        app.select_highlighted();
        assert!(app.board.selection().is_idle());
        assert_eq!(app.focus, Focus::Pool);
    }

    #[test]
    fn test_rejected_placement_shows_notice() {
        let mut app = app();
        app.select_highlighted();
        app.cursor.column = ColumnId::Pca;
        app.place_at_cursor();

        assert_eq!(app.state, AppState::ShowingNotice);
        assert_eq!(app.notice.as_deref(), Some(PT_IN_SUPPORT_COLUMN));
        assert!(app.board.roster().is_empty());

        app.dismiss_notice();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_place_toggles_and_reports() {
        let mut app = app();
        app.select_highlighted();
        app.place_at_cursor();
        let cell: CellId = "1st-T1_PTI".parse().unwrap();
        assert_eq!(app.board.roster().occupants(&cell), ["p1"]);
        assert_eq!(app.status_message.as_deref(), Some("Alice assigned to 1st PT I"));

        app.place_at_cursor();
        assert!(app.board.roster().occupants(&cell).is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Alice removed from 1st PT I"));
    }

    #[test]
    fn test_header_row_stamps_column() {
        let mut app = app();
        app.pool_down();
        app.select_highlighted();
        app.cursor.up();
        app.cursor.right();
        app.place_at_cursor();

        for session in Session::ALL {
            let cell = CellId::new(session, ColumnId::T1PtII);
            assert_eq!(app.board.roster().occupants(&cell), ["p2"]);
        }
        assert_eq!(app.board.physio_fte(), 1.0);
    }

    #[test]
    fn test_placing_with_nothing_armed_only_reports() {
        let mut app = app();
        app.stamp_cursor_column();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.status_message.is_some());
        assert!(app.board.roster().is_empty());
    }

    #[test]
    fn test_role_filter_resets_pool_and_selection() {
        let mut app = app();
        app.pool_down();
        app.select_highlighted();
        app.set_role_filter(StaffRole::Support);

        assert!(app.board.selection().is_idle());
        assert_eq!(app.pool_selection, 0);
        assert_eq!(app.highlighted_staff().map(|m| m.id.as_str()), Some("s1"));
    }

    #[test]
    fn test_pool_selection_stays_in_bounds() {
        let mut app = app();
        app.set_role_filter(StaffRole::Support);
        for _ in 0..10 {
            app.pool_down();
        }
        assert_eq!(app.pool_selection, 3);
        app.pool_up();
        assert_eq!(app.pool_selection, 2);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = app();
        app.select_highlighted();
        app.stamp_cursor_column();
        app.request_reset();
        assert_eq!(app.state, AppState::ConfirmingReset);
        assert!(!app.board.roster().is_empty());

        app.confirm_reset();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.board.roster().is_empty());
        assert!(app.board.selection().is_idle());
    }

    // -------------------------------------------------------------------------
    // Export Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_export_clears_selection_and_previews() {
        let dir = scratch_dir("app-export");
        let mut app = app_with(false, dir.clone());
        app.select_highlighted();
        app.place_at_cursor();

        app.start_export();
        assert!(app.is_exporting());
        assert!(app.board.selection().is_idle());

        wait_for_export(&mut app).await;
        assert_eq!(app.state, AppState::ExportReady);
        let file_name = app.export_file_name().unwrap();
        assert!(file_name.starts_with("roster-") && file_name.ends_with(".jpg"));

        app.save_export();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(std::fs::read(dir.join(file_name)).unwrap(), vec![1; 4]);
    }

    #[tokio::test]
    async fn test_export_failure_is_visible_and_retryable() {
        let mut app = app_with(true, PathBuf::from("."));
        app.start_export();
        wait_for_export(&mut app).await;

        assert_eq!(app.state, AppState::ExportFailed);
        assert!(app.export_error.as_deref().unwrap().contains("no canvas"));

        app.retry_export();
        assert!(app.is_exporting());
        assert!(app.export_error.is_none());
        wait_for_export(&mut app).await;
        assert_eq!(app.state, AppState::ExportFailed);
    }

    #[tokio::test]
    async fn test_second_export_request_is_ignored() {
        let mut app = app();
        app.start_export();
        app.start_export();
        wait_for_export(&mut app).await;
        assert_eq!(app.state, AppState::ExportReady);

        // Only one outcome was produced
        app.dismiss_export();
        tokio::time::sleep(Duration::from_millis(50)).await;
        app.check_background_tasks();
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_export_date_is_the_utc_calendar_day() {
        let late = DateTime::parse_from_rfc3339("2026-10-18T23:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(export_date(late), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let early = DateTime::parse_from_rfc3339("2026-10-18T00:15:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(export_date(early), NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }
}
