//! Puzzle layouts: the grid of pieces, its edges, and drawing them out to one or many documents
use std::io::Write;

use nalgebra::geometry::Point2;
use rand::Rng;

use crate::geometry::LineSegment;
use crate::knob::{make_knob, KnobChoice};
use crate::{polyline, rounded_rect, svg_footer, svg_header, JigsawError};

pub const DEFAULT_COLUMNS: u32 = 8;
pub const DEFAULT_ROWS: u32 = 10;
pub const DEFAULT_DPI: f64 = 96.0;
pub const DEFAULT_COLOR: &str = "#000000";

/// Name of the document written in single file mode
pub const SINGLE_FILE_NAME: &str = "jigsaw.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The whole puzzle in one document, with a rounded border
    Single,
    /// One document per piece
    Separate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A single piece, by its 0-indexed row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub column: u32,
}

/// An internal edge, shared by exactly two pieces.
/// A horizontal edge at (row, column) runs along the bottom of cell (row, column),
/// a vertical edge along its right side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub orientation: Orientation,
    pub row: u32,
    pub column: u32,
    pub segment: LineSegment,
}

impl Edge {
    /// The two pieces on either side of this edge
    pub fn neighbors(&self) -> [Cell; 2] {
        let here = Cell {
            row: self.row,
            column: self.column,
        };
        let there = match self.orientation {
            Orientation::Horizontal => Cell {
                row: self.row + 1,
                column: self.column,
            },
            Orientation::Vertical => Cell {
                row: self.row,
                column: self.column + 1,
            },
        };
        [here, there]
    }
}

/// A straight piece of the outside of the puzzle, belonging to a single piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSegment {
    pub cell: Cell,
    pub segment: LineSegment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    unit: f64,
    color: String,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            unit: DEFAULT_DPI,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Grid {
    pub fn new(columns: u32, rows: u32, unit: f64, color: &str) -> Result<Self, JigsawError> {
        if columns == 0 || rows == 0 {
            return Err(JigsawError::InvalidConfiguration(format!(
                "need at least one row and column, got {} columns and {} rows",
                columns, rows
            )));
        }
        if !unit.is_finite() || unit <= 0.0 {
            return Err(JigsawError::InvalidConfiguration(format!(
                "piece size must be positive, got {}",
                unit
            )));
        }
        Ok(Grid {
            columns,
            rows,
            unit,
            color: color.to_string(),
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn width(&self) -> f64 {
        self.columns as f64 * self.unit
    }

    pub fn height(&self) -> f64 {
        self.rows as f64 * self.unit
    }

    /// Corner radius of the outer border
    pub fn corner_radius(&self) -> f64 {
        self.width() / self.rows as f64 / 3.0
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Grid point at the top left of the cell at (`column`, `row`). Either may be one past the end.
    pub fn corner(&self, column: u32, row: u32) -> Point2<f64> {
        Point2::new(
            column as f64 * self.unit(),
            row as f64 * self.unit(),
        )
    }

    /// Row-major index of `cell`
    pub fn index(&self, cell: Cell) -> usize {
        assert!(
            cell.row < self.rows && cell.column < self.columns,
            "cell {:?} outside of the grid",
            cell
        );
        cell.row as usize * self.columns as usize + cell.column as usize
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| Cell { row, column }))
    }

    /// Every horizontal internal edge, row by row
    pub fn horizontal_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.rows - 1).flat_map(move |row| {
            (0..self.columns).map(move |column| Edge {
                orientation: Orientation::Horizontal,
                row,
                column,
                segment: LineSegment::new(
                    self.corner(column, row + 1),
                    self.corner(column + 1, row + 1),
                ),
            })
        })
    }

    /// Every vertical internal edge, row by row
    pub fn vertical_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns - 1).map(move |column| Edge {
                orientation: Orientation::Vertical,
                row,
                column,
                segment: LineSegment::new(
                    self.corner(column + 1, row),
                    self.corner(column + 1, row + 1),
                ),
            })
        })
    }

    /// Horizontal edges, then vertical edges
    pub fn internal_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.horizontal_edges().chain(self.vertical_edges())
    }

    pub fn internal_edge_count(&self) -> usize {
        let (rows, columns) = (self.rows as usize, self.columns as usize);
        (rows - 1) * columns + rows * (columns - 1)
    }

    /// The straight outside edges of the puzzle: left, right, top, then bottom
    pub fn border_segments(&self) -> Vec<BorderSegment> {
        let mut segments = Vec::with_capacity(2 * (self.rows + self.columns) as usize);
        let last_row = self.rows - 1;
        let last_column = self.columns - 1;
        for row in 0..self.rows {
            segments.push(BorderSegment {
                cell: Cell { row, column: 0 },
                segment: LineSegment::new(self.corner(0, row), self.corner(0, row + 1)),
            });
        }
        for row in 0..self.rows {
            segments.push(BorderSegment {
                cell: Cell {
                    row,
                    column: last_column,
                },
                segment: LineSegment::new(
                    self.corner(self.columns, row),
                    self.corner(self.columns, row + 1),
                ),
            });
        }
        for column in 0..self.columns {
            segments.push(BorderSegment {
                cell: Cell { row: 0, column },
                segment: LineSegment::new(self.corner(column, 0), self.corner(column + 1, 0)),
            });
        }
        for column in 0..self.columns {
            segments.push(BorderSegment {
                cell: Cell {
                    row: last_row,
                    column,
                },
                segment: LineSegment::new(
                    self.corner(column, self.rows),
                    self.corner(column + 1, self.rows),
                ),
            });
        }
        segments
    }
}

/// File name for the document of a single piece
pub fn piece_file_name(cell: Cell) -> String {
    format!("jigsaw_{}_{}.svg", cell.row, cell.column)
}

/// Which piece documents an edge's curve goes to
pub fn route(edge: &Edge) -> [Cell; 2] {
    edge.neighbors()
}

/// Generate the knob curve for `edge`. Failures carry the edge they happened on.
pub fn edge_curve(edge: &Edge, choice: &KnobChoice) -> Result<Vec<Point2<f64>>, JigsawError> {
    make_knob(edge.segment.start, edge.segment.end, choice)
        .map(|curve| curve.points)
        .map_err(|e| JigsawError::EdgeFailed {
            orientation: edge.orientation,
            row: edge.row,
            column: edge.column,
            source: Box::new(e),
        })
}

/// Draw the whole puzzle into a single document
pub fn draw_single<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    file: &mut dyn Write,
) -> Result<(), JigsawError> {
    svg_header(file, grid.width(), grid.height())?;
    rounded_rect(
        file,
        grid.width(),
        grid.height(),
        grid.corner_radius(),
        grid.color(),
    )?;
    for edge in grid.internal_edges() {
        let curve = edge_curve(&edge, &KnobChoice::random(rng))?;
        polyline(file, &curve, grid.color())?;
    }
    svg_footer(file)?;
    Ok(())
}

/// Draw one document per piece. `pieces` holds one writer per cell, in row-major order.
/// Pieces keep their place on the full canvas, so every document is the size of the whole puzzle.
/// Each internal curve is generated once and written to both pieces that share it.
pub fn draw_separate<R: Rng + ?Sized, W: Write>(
    grid: &Grid,
    rng: &mut R,
    pieces: &mut [W],
) -> Result<(), JigsawError> {
    if pieces.len() != grid.cell_count() {
        return Err(JigsawError::InvalidConfiguration(format!(
            "expected {} piece outputs, got {}",
            grid.cell_count(),
            pieces.len()
        )));
    }

    for piece in pieces.iter_mut() {
        svg_header(piece, grid.width(), grid.height())?;
    }

    for edge in grid.internal_edges() {
        let curve = edge_curve(&edge, &KnobChoice::random(rng))?;
        for cell in route(&edge).iter() {
            polyline(&mut pieces[grid.index(*cell)], &curve, grid.color())?;
        }
    }

    for border in grid.border_segments() {
        polyline(
            &mut pieces[grid.index(border.cell)],
            &border.segment.points(),
            grid.color(),
        )?;
    }

    for piece in pieces.iter_mut() {
        svg_footer(piece)?;
    }
    Ok(())
}
