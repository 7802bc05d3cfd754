//! Geometry of the exported board.
//!
//! Layout is computed separately from painting so it can be tested without
//! a canvas. All measurements below are logical pixels on the fixed
//! 1280x960 board and are multiplied by the pixel ratio when laid out.

use crate::fte;
use crate::models::{CellId, ColumnId, MagnetColor, Session, StaffMember, StaffRole};

use super::{BoardSnapshot, ExportOptions, Rgb, EXPORT_HEIGHT, EXPORT_WIDTH};

const MARGIN: f32 = 16.0;
const TEAM_BAND_HEIGHT: f32 = 48.0;
const COLUMN_HEADER_HEIGHT: f32 = 48.0;
const FOOTER_HEIGHT: f32 = 56.0;
const LABEL_WIDTH: f32 = 64.0;

const MAGNET_WIDTH: f32 = 104.0;
const MAGNET_HEIGHT: f32 = 34.0;
const MAGNET_GAP: f32 = 8.0;
const COLOR_TAG_WIDTH: f32 = 8.0;
const MAGNET_PADDING: f32 = 6.0;

const FOOTER_LABEL_WIDTH: f32 = 240.0;
const TEXT_INSET: f32 = 16.0;

// Font sizes
const TEAM_TEXT: f32 = 15.0;
const HEADER_TEXT: f32 = 16.0;
const SESSION_TEXT: f32 = 16.0;
const MAGNET_TEXT: f32 = 13.0;
const FOOTER_TEXT: f32 = 20.0;

const TALLY_SIZE: f32 = 20.0;
const TALLY_GAP: f32 = 6.0;

const GRID_LINE_WIDTH: f32 = 1.0;

// Palette
const HEADER_FILL: Rgb = Rgb::new(248, 250, 252);
const TEAM_FILL: Rgb = Rgb::new(241, 245, 249);
const GRID_LINE: Rgb = Rgb::new(229, 231, 235);
const PT_MAGNET: Rgb = Rgb::new(224, 231, 255);
const PT_TEXT: Rgb = Rgb::new(67, 56, 202);
const SUPPORT_MAGNET: Rgb = Rgb::new(209, 250, 229);
const SUPPORT_TEXT: Rgb = Rgb::new(4, 120, 87);
const YELLOW_TAG: Rgb = Rgb::new(252, 211, 77);
const OVERFLOW_FILL: Rgb = Rgb::new(226, 232, 240);
const LABEL_TEXT: Rgb = Rgb::new(51, 65, 85);
const TALLY_FILL: Rgb = Rgb::new(37, 99, 235);

/// What a shape on the board represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    TeamBand(&'static str),
    ColumnHeader(ColumnId),
    SessionLabel(Session),
    Magnet { cell: CellId, staff_id: String },
    ColorTag { cell: CellId, staff_id: String },
    /// Stands in for occupants that do not fit in the cell.
    Overflow { cell: CellId, hidden: usize },
    Footer,
    /// One quarter of physio FTE.
    FteTally,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Bounds,
    pub fill: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A line of text fitted into `bounds` and centered vertically.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub bounds: Bounds,
    /// Pixel height of the font.
    pub size: f32,
    pub color: Rgb,
    pub align: TextAlign,
}

/// Pre-calculated layout of one board snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    /// Painted in order, so later shapes sit on top.
    pub shapes: Vec<Shape>,
    pub lines: Vec<GridLine>,
    /// Painted last, over shapes and lines.
    pub texts: Vec<TextRun>,
}

/// Logical board frame measurements, before scaling.
struct Frame {
    left: f32,
    top: f32,
    width: f32,
    row_height: f32,
    column_width: f32,
}

impl Frame {
    fn new() -> Self {
        let width = EXPORT_WIDTH as f32 - 2.0 * MARGIN;
        let height = EXPORT_HEIGHT as f32 - 2.0 * MARGIN;
        let rows_height = height - TEAM_BAND_HEIGHT - COLUMN_HEADER_HEIGHT - FOOTER_HEIGHT;
        Self {
            left: MARGIN,
            top: MARGIN,
            width,
            row_height: rows_height / Session::ALL.len() as f32,
            column_width: (width - LABEL_WIDTH) / ColumnId::ALL.len() as f32,
        }
    }

    fn header_top(&self) -> f32 {
        self.top + TEAM_BAND_HEIGHT
    }

    fn rows_top(&self) -> f32 {
        self.header_top() + COLUMN_HEADER_HEIGHT
    }

    fn footer_top(&self) -> f32 {
        self.rows_top() + self.row_height * Session::ALL.len() as f32
    }

    fn bottom(&self) -> f32 {
        self.footer_top() + FOOTER_HEIGHT
    }

    fn column_left(&self, index: usize) -> f32 {
        self.left + LABEL_WIDTH + self.column_width * index as f32
    }

    fn row_top(&self, index: usize) -> f32 {
        self.rows_top() + self.row_height * index as f32
    }
}

impl BoardLayout {
    /// Lay out `snapshot` for a canvas sized by `options`.
    pub fn compute(snapshot: &BoardSnapshot, options: &ExportOptions) -> Self {
        let (width, height) = options.canvas_size();
        let mut layout = Self {
            width,
            height,
            background: options.background,
            shapes: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        };
        let frame = Frame::new();
        let scale = options.pixel_ratio;

        layout.add_headers(&frame, scale);
        layout.add_magnets(snapshot, &frame, scale);
        layout.add_footer(snapshot, &frame, scale);
        layout.add_grid_lines(&frame, scale);
        layout
    }

    fn push(&mut self, kind: ShapeKind, x: f32, y: f32, w: f32, h: f32, fill: Rgb, scale: f32) {
        self.shapes.push(Shape {
            kind,
            bounds: Bounds {
                x: x * scale,
                y: y * scale,
                w: w * scale,
                h: h * scale,
            },
            fill,
        });
    }

    fn push_text(
        &mut self,
        text: impl Into<String>,
        bounds: Bounds,
        size: f32,
        color: Rgb,
        align: TextAlign,
        scale: f32,
    ) {
        self.texts.push(TextRun {
            text: text.into(),
            bounds: Bounds {
                x: bounds.x * scale,
                y: bounds.y * scale,
                w: bounds.w * scale,
                h: bounds.h * scale,
            },
            size: size * scale,
            color,
            align,
        });
    }

    fn add_headers(&mut self, frame: &Frame, scale: f32) {
        // Team bands span their two columns; PCA has no band
        let mut index = 0;
        while index < ColumnId::ALL.len() {
            let column = ColumnId::ALL[index];
            let span = ColumnId::ALL[index..]
                .iter()
                .take_while(|c| c.team() == column.team())
                .count();
            if let Some(team) = column.team() {
                let bounds = Bounds {
                    x: frame.column_left(index),
                    y: frame.top,
                    w: frame.column_width * span as f32,
                    h: TEAM_BAND_HEIGHT,
                };
                self.push(ShapeKind::TeamBand(team), bounds.x, bounds.y, bounds.w, bounds.h, TEAM_FILL, scale);
                self.push_text(team.to_uppercase(), bounds, TEAM_TEXT, LABEL_TEXT, TextAlign::Center, scale);
            }
            index += span;
        }

        for column in ColumnId::ALL {
            let bounds = Bounds {
                x: frame.column_left(column.index()),
                y: frame.header_top(),
                w: frame.column_width,
                h: COLUMN_HEADER_HEIGHT,
            };
            self.push(ShapeKind::ColumnHeader(column), bounds.x, bounds.y, bounds.w, bounds.h, HEADER_FILL, scale);
            self.push_text(column.label(), bounds, HEADER_TEXT, LABEL_TEXT, TextAlign::Center, scale);
        }

        for session in Session::ALL {
            let bounds = Bounds {
                x: frame.left,
                y: frame.row_top(session.index()),
                w: LABEL_WIDTH,
                h: frame.row_height,
            };
            self.push(ShapeKind::SessionLabel(session), bounds.x, bounds.y, bounds.w, bounds.h, HEADER_FILL, scale);
            self.push_text(session.as_str(), bounds, SESSION_TEXT, LABEL_TEXT, TextAlign::Center, scale);
        }
    }

    fn add_magnets(&mut self, snapshot: &BoardSnapshot, frame: &Frame, scale: f32) {
        let per_row = (((frame.column_width - MAGNET_GAP) / (MAGNET_WIDTH + MAGNET_GAP)).floor()
            as usize)
            .max(1);
        let rows = (((frame.row_height - MAGNET_GAP) / (MAGNET_HEIGHT + MAGNET_GAP)).floor()
            as usize)
            .max(1);
        let capacity = per_row * rows;
        let used_width = per_row as f32 * (MAGNET_WIDTH + MAGNET_GAP) - MAGNET_GAP;
        let inset = (frame.column_width - used_width) / 2.0;

        for (cell, ids) in snapshot.roster.iter() {
            let cell_left = frame.column_left(cell.column.index());
            let cell_top = frame.row_top(cell.session.index());
            let slot_bounds = |slot: usize| Bounds {
                x: cell_left + inset + (slot % per_row) as f32 * (MAGNET_WIDTH + MAGNET_GAP),
                y: cell_top + MAGNET_GAP + (slot / per_row) as f32 * (MAGNET_HEIGHT + MAGNET_GAP),
                w: MAGNET_WIDTH,
                h: MAGNET_HEIGHT,
            };

            // Unknown ids are not drawn, so positions pack the known ones
            let members: Vec<&StaffMember> =
                ids.iter().filter_map(|id| snapshot.staff_member(id)).collect();
            let shown = if members.len() > capacity {
                capacity - 1
            } else {
                members.len()
            };

            for (slot, member) in members[..shown].iter().enumerate() {
                self.add_magnet(*cell, member, slot_bounds(slot), scale);
            }

            let hidden = members.len() - shown;
            if hidden > 0 {
                let bounds = slot_bounds(shown);
                self.push(
                    ShapeKind::Overflow { cell: *cell, hidden },
                    bounds.x,
                    bounds.y,
                    bounds.w,
                    bounds.h,
                    OVERFLOW_FILL,
                    scale,
                );
                self.push_text(
                    format!("+{} more", hidden),
                    bounds,
                    MAGNET_TEXT,
                    LABEL_TEXT,
                    TextAlign::Center,
                    scale,
                );
            }
        }
    }

    fn add_magnet(&mut self, cell: CellId, member: &StaffMember, bounds: Bounds, scale: f32) {
        let (fill, text_color) = match member.role {
            StaffRole::Pt => (PT_MAGNET, PT_TEXT),
            StaffRole::Support => (SUPPORT_MAGNET, SUPPORT_TEXT),
        };
        self.push(
            ShapeKind::Magnet {
                cell,
                staff_id: member.id.clone(),
            },
            bounds.x,
            bounds.y,
            bounds.w,
            bounds.h,
            fill,
            scale,
        );
        if member.default_color == MagnetColor::Yellow {
            self.push(
                ShapeKind::ColorTag {
                    cell,
                    staff_id: member.id.clone(),
                },
                bounds.x,
                bounds.y,
                COLOR_TAG_WIDTH,
                bounds.h,
                YELLOW_TAG,
                scale,
            );
        }

        let text_left = bounds.x + COLOR_TAG_WIDTH + MAGNET_PADDING;
        let text_bounds = Bounds {
            x: text_left,
            y: bounds.y,
            w: bounds.x + bounds.w - MAGNET_PADDING - text_left,
            h: bounds.h,
        };
        self.push_text(
            member.name.to_uppercase(),
            text_bounds,
            MAGNET_TEXT,
            text_color,
            TextAlign::Center,
            scale,
        );
    }

    fn add_footer(&mut self, snapshot: &BoardSnapshot, frame: &Frame, scale: f32) {
        self.push(
            ShapeKind::Footer,
            frame.left,
            frame.footer_top(),
            frame.width,
            FOOTER_HEIGHT,
            HEADER_FILL,
            scale,
        );
        self.push_text(
            format!("Physio FTE: {}", fte::format_fte(snapshot.physio_fte)),
            Bounds {
                x: frame.left + TEXT_INSET,
                y: frame.footer_top(),
                w: FOOTER_LABEL_WIDTH - TEXT_INSET,
                h: FOOTER_HEIGHT,
            },
            FOOTER_TEXT,
            LABEL_TEXT,
            TextAlign::Left,
            scale,
        );

        // Tallies run right to left from the footer's right edge
        let max_tallies =
            ((frame.width - FOOTER_LABEL_WIDTH) / (TALLY_SIZE + TALLY_GAP)).floor() as usize;
        let tally_top = frame.footer_top() + (FOOTER_HEIGHT - TALLY_SIZE) / 2.0;
        let right = frame.left + frame.width - TALLY_GAP;
        for i in 0..snapshot.physio_placements.min(max_tallies) {
            let x = right - (i + 1) as f32 * (TALLY_SIZE + TALLY_GAP) + TALLY_GAP;
            self.push(
                ShapeKind::FteTally,
                x,
                tally_top,
                TALLY_SIZE,
                TALLY_SIZE,
                TALLY_FILL,
                scale,
            );
        }
    }

    fn add_grid_lines(&mut self, frame: &Frame, scale: f32) {
        let width = (GRID_LINE_WIDTH * scale).max(1.0);
        let mut line = |x1: f32, y1: f32, x2: f32, y2: f32| {
            self.lines.push(GridLine {
                x1: x1 * scale,
                y1: y1 * scale,
                x2: x2 * scale,
                y2: y2 * scale,
                width,
                color: GRID_LINE,
            });
        };

        let right = frame.left + frame.width;
        // Horizontal: top, under team band, under headers, between rows, above and below footer
        line(frame.left, frame.top, right, frame.top);
        line(frame.left, frame.header_top(), right, frame.header_top());
        for row in 0..=Session::ALL.len() {
            let y = frame.row_top(row);
            line(frame.left, y, right, y);
        }
        line(frame.left, frame.bottom(), right, frame.bottom());

        // Vertical: outer edges, label divider and column dividers
        line(frame.left, frame.top, frame.left, frame.bottom());
        for column in 0..=ColumnId::ALL.len() {
            let x = frame.column_left(column);
            line(x, frame.top, x, frame.footer_top());
        }
        line(right, frame.top, right, frame.bottom());
    }

    pub fn magnets(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s.kind, ShapeKind::Magnet { .. }))
    }

    pub fn count(&self, predicate: impl Fn(&ShapeKind) -> bool) -> usize {
        self.shapes.iter().filter(|s| predicate(&s.kind)).count()
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t.text == text)
    }
}
