use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

pub type Glyph = char;

pub const GLYPH_EMPTY: Glyph = '.';
pub const GLYPH_OCCUPIED: Glyph = '#';
pub const GLYPH_STAR: Glyph = '*';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Occupied,
    Star,
}

impl CellKind {
    pub const fn glyph(self) -> Glyph {
        match self {
            CellKind::Empty => GLYPH_EMPTY,
            CellKind::Occupied => GLYPH_OCCUPIED,
            CellKind::Star => GLYPH_STAR,
        }
    }

    pub fn from_glyph(glyph: Glyph) -> Option<Self> {
        match glyph {
            GLYPH_EMPTY | ' ' => Some(CellKind::Empty),
            GLYPH_OCCUPIED => Some(CellKind::Occupied),
            GLYPH_STAR => Some(CellKind::Star),
            _ => None,
        }
    }

    /// Occupied and star cells both respond to pointer hits.
    pub const fn is_interactive(self) -> bool {
        matches!(self, CellKind::Occupied | CellKind::Star)
    }
}

/// Rectangular grid of cell kinds in the shape's local frame.
///
/// Row 0 is the top row and column 0 the leftmost column. Only `Occupied`
/// cells take up room on the warehouse grid; `Star` cells are link points
/// that may sit on top of another item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Shape {
    cells: Vec<Vec<CellKind>>,
}

impl Shape {
    /// Rows must all have the same length. Rows with no cells at all collapse
    /// to the empty shape.
    pub fn new(cells: Vec<Vec<CellKind>>) -> Result<Self, ShapeError> {
        let expected = cells.first().map_or(0, Vec::len);
        for (row, cells_in_row) in cells.iter().enumerate() {
            if cells_in_row.len() != expected {
                return Err(ShapeError::Ragged {
                    row,
                    expected,
                    found: cells_in_row.len(),
                });
            }
        }
        if expected == 0 {
            return Ok(Self::default());
        }
        Ok(Self { cells })
    }

    /// Builds a shape from glyph rows such as `["##", "#*"]`.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, ShapeError> {
        let mut cells = Vec::with_capacity(rows.len());
        for (row, text) in rows.iter().enumerate() {
            let mut parsed = Vec::new();
            for (col, glyph) in text.as_ref().chars().enumerate() {
                let kind = CellKind::from_glyph(glyph)
                    .ok_or(ShapeError::UnknownGlyph { glyph, row, col })?;
                parsed.push(kind);
            }
            cells.push(parsed);
        }
        Self::new(cells)
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellKind>] {
        &self.cells
    }

    /// Cell at a signed local coordinate; `None` outside the bounding box.
    pub fn cell(&self, row: i32, col: i32) -> Option<CellKind> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.cell(row, col) == Some(CellKind::Occupied)
    }

    pub fn is_star(&self, row: i32, col: i32) -> bool {
        self.cell(row, col) == Some(CellKind::Star)
    }

    pub fn is_interactive(&self, row: i32, col: i32) -> bool {
        self.cell(row, col).is_some_and(CellKind::is_interactive)
    }

    /// Row-major `(row, col)` offsets of every cell of `kind`.
    pub fn positions_of(&self, kind: CellKind) -> Vec<(i32, i32)> {
        let mut positions = Vec::new();
        for (row, cells) in self.cells.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                if cell == kind {
                    positions.push((row as i32, col as i32));
                }
            }
        }
        positions
    }

    pub fn occupied_positions(&self) -> Vec<(i32, i32)> {
        self.positions_of(CellKind::Occupied)
    }

    pub fn star_positions(&self) -> Vec<(i32, i32)> {
        self.positions_of(CellKind::Star)
    }

    pub fn occupied_count(&self) -> usize {
        self.count_of(CellKind::Occupied)
    }

    pub fn star_count(&self) -> usize {
        self.count_of(CellKind::Star)
    }

    fn count_of(&self, kind: CellKind) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == kind)
            .count()
    }

    /// Rotate clockwise: rotated[c][rows-1-r] = shape[r][c].
    pub fn rotated_clockwise(&self) -> Shape {
        let rows = self.height();
        let cols = self.width();
        let mut rotated = vec![vec![CellKind::Empty; rows]; cols];
        for (r, cells) in self.cells.iter().enumerate() {
            for (c, &cell) in cells.iter().enumerate() {
                rotated[c][rows - 1 - r] = cell;
            }
        }
        Shape { cells: rotated }
    }

    pub fn glyph_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.glyph()).collect())
            .collect()
    }
}

impl TryFrom<Vec<String>> for Shape {
    type Error = ShapeError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Shape::parse(&rows)
    }
}

impl From<Shape> for Vec<String> {
    fn from(shape: Shape) -> Self {
        shape.glyph_rows()
    }
}

impl FromStr for Shape {
    type Err = ShapeError;

    /// Rows separated by `/` or newlines, e.g. `"##/#*"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .split(['/', '\n'])
            .map(str::trim_end)
            .filter(|row| !row.is_empty())
            .collect();
        Shape::parse(&rows)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.glyph_rows().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_glyphs_row_major() {
        let shape = Shape::parse(&["#*", ".#"]).expect("shape should parse");
        assert_eq!(shape.width(), 2);
        assert_eq!(shape.height(), 2);
        assert_eq!(shape.occupied_positions(), vec![(0, 0), (1, 1)]);
        assert_eq!(shape.star_positions(), vec![(0, 1)]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Shape::parse(&["##", "#"]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        let err = Shape::parse(&["#x"]).unwrap_err();
        assert!(matches!(err, ShapeError::UnknownGlyph { glyph: 'x', row: 0, col: 1 }));
    }

    #[test]
    fn empty_shape_has_zero_dimensions() {
        let shape = Shape::new(Vec::new()).expect("empty shape is valid");
        assert_eq!(shape.width(), 0);
        assert_eq!(shape.height(), 0);
        assert!(shape.is_empty());
        assert_eq!(shape.rotated_clockwise(), shape);
    }

    #[test]
    fn zero_width_rows_collapse_to_empty_shape() {
        let shape = Shape::parse(&["", ""]).expect("blank rows are valid");
        assert_eq!((shape.height(), shape.width()), (0, 0));
        assert!(shape.is_empty());

        let mut turned = shape.clone();
        for _ in 0..4 {
            turned = turned.rotated_clockwise();
        }
        assert_eq!(turned, shape);
    }

    #[test]
    fn out_of_bounds_queries_are_false() {
        let shape: Shape = "#*".parse().expect("shape should parse");
        for (row, col) in [(-1, 0), (0, -1), (1, 0), (0, 2)] {
            assert!(!shape.is_occupied(row, col));
            assert!(!shape.is_star(row, col));
            assert!(!shape.is_interactive(row, col));
        }
        assert!(shape.is_interactive(0, 1));
    }

    #[test]
    fn serde_uses_glyph_rows() {
        let shape: Shape = "##/.*".parse().expect("shape should parse");
        let json = serde_json::to_string(&shape).expect("shape should serialize");
        assert_eq!(json, r###"["##",".*"]"###);
        let back: Shape = serde_json::from_str(&json).expect("shape should deserialize");
        assert_eq!(back, shape);
        assert!(serde_json::from_str::<Shape>(r###"["##","#"]"###).is_err());
    }
}
