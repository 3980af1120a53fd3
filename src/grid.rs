//! Hexagonal cell layout. The grid is rebuilt wholesale whenever the
//! surface changes size; it always overshoots the edges by a margin so a
//! resize never exposes a gap.

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cell {
    /// Center of the hexagon in surface coordinates.
    pub(crate) position: (f64, f64),
    /// Current rendered brightness, [0, 1].
    pub(crate) fill: f64,
    /// Instantaneous ideal brightness the fill chases, [0, 1].
    pub(crate) target_fill: f64,
}

pub(crate) struct Grid {
    pub(crate) cells: Vec<Cell>,
    pub(crate) hex_radius: f64,
    pub(crate) hex_width: f64,
    pub(crate) hex_height: f64,
    /// Vertical distance between row centers (0.75 * hex height).
    pub(crate) row_pitch: f64,
    /// Horizontal distance between column centers.
    pub(crate) col_pitch: f64,
}

/// Extra rings of cells past every edge.
const MARGIN: i64 = 2;

impl Grid {
    pub(crate) fn build(width: f64, height: f64, hex_radius: f64) -> Self {
        let hex_width = 3.0_f64.sqrt() * hex_radius;
        let hex_height = 2.0 * hex_radius;
        let row_pitch = hex_height * 0.75;
        let col_pitch = hex_width;

        let mut cells = Vec::new();
        // Degenerate dimensions (layout thrash) produce an empty grid
        // rather than a division by zero or an unbounded loop.
        if width > 0.0 && height > 0.0 && hex_radius > 0.0 {
            let rows = (height / row_pitch).ceil() as i64 + MARGIN;
            let cols = (width / col_pitch).ceil() as i64 + MARGIN;
            cells.reserve(((rows + MARGIN + 1) * (cols + MARGIN + 1)) as usize);

            for row in -MARGIN..=rows {
                // Odd rows shift half a column so the hexes tessellate.
                let x_off = if row.rem_euclid(2) == 1 {
                    col_pitch * 0.5
                } else {
                    0.0
                };
                for col in -MARGIN..=cols {
                    cells.push(Cell {
                        position: (col as f64 * col_pitch + x_off, row as f64 * row_pitch),
                        fill: 0.0,
                        target_fill: 0.0,
                    });
                }
            }
        }

        Self {
            cells,
            hex_radius,
            hex_width,
            hex_height,
            row_pitch,
            col_pitch,
        }
    }
}
