use crate::grid::Grid;

use ::std::fmt;

use itertools::Itertools;

// Grids larger than this along an axis are elided along that axis.
const PRINT_THRESHOLD: usize = 10;
// How many leading and trailing lanes survive elision.
const EDGE_ITEMS: usize = 5;

/// Renders as `Grid[<type>] <height>x<width> [[a b c] [d e f]]`.
///
/// Axes longer than 10 are summarized independently: the first and
/// last 5 rows (or columns) are kept and the middle is replaced by a
/// literal `...`.  Empty grids render as `[]`.
impl<T: fmt::Display> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "Grid[{}] {}x{} ",
            ::std::any::type_name::<T>(), self.height(), self.width())?;

        if self.height() == 0 || self.width() == 0 {
            return f.write_str("[]");
        }

        let summarize_rows = self.height() > PRINT_THRESHOLD;
        let mut parts = Vec::new();
        let mut row = 0;
        while row < self.height() {
            if summarize_rows && row == EDGE_ITEMS {
                parts.push("...".to_string());
                row = self.height() - EDGE_ITEMS;
                continue;
            }
            parts.push(format!("[{}]", self.row_body(row)));
            row += 1;
        }
        write!(f, "[{}]", parts.iter().join(" "))
    }
}

impl<T: fmt::Display> Grid<T> {
    fn row_body(&self, row: usize) -> String
    {
        let summarize_cols = self.width() > PRINT_THRESHOLD;
        let mut cells = Vec::new();
        let mut col = 0;
        while col < self.width() {
            if summarize_cols && col == EDGE_ITEMS {
                cells.push("...".to_string());
                col = self.width() - EDGE_ITEMS;
                continue;
            }
            cells.push(self.at(row, col).to_string());
            col += 1;
        }
        cells.iter().join(" ")
    }
}
