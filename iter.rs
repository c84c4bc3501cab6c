use crate::GridError;
use crate::grid::{check, Grid};

use ::std::ops::Range;

impl<T> Grid<T> {
    /// Iterate over `(row, col, &value)` for every element, in
    /// row-major visitation order regardless of storage layout:
    /// `(0,0), (0,1), ..., (0,w-1), (1,0), ...`.
    pub fn indexed_iter(&self) -> IndexedIter<'_, T>
    {
        IndexedIter { grid: self, range: 0..self.len() }
    }

    /// Iterate over `(col, &value)` across one row, left to right.
    ///
    /// Fails fast with [`GridError::OutOfBounds`] when the row index
    /// is invalid, rather than yielding an empty iterator.
    pub fn row_iter(&self, row: usize) -> Result<RowIter<'_, T>, GridError>
    {
        check("row", row, self.height())?;
        Ok(RowIter { grid: self, row, cols: 0..self.width() })
    }

    /// Iterate over `(row, &value)` down one column, top to bottom.
    /// Fails fast on an invalid column index.
    pub fn col_iter(&self, col: usize) -> Result<ColIter<'_, T>, GridError>
    {
        check("col", col, self.width())?;
        Ok(ColIter { grid: self, col, rows: 0..self.height() })
    }

    /// A cursor over whole rows, in the style of `sql.Rows`: call
    /// [`RowCursor::advance`], then [`RowCursor::scan_into`] to copy
    /// the current row into a caller-supplied buffer.
    pub fn rows(&self) -> RowCursor<'_, T>
    {
        RowCursor { grid: self, state: CursorState::NotStarted }
    }

    /// A cursor over whole columns; mirror image of [`Grid::rows`].
    pub fn cols(&self) -> ColCursor<'_, T>
    {
        ColCursor { grid: self, state: CursorState::NotStarted }
    }
}

/// See [`Grid::indexed_iter`].
pub struct IndexedIter<'a, T> {
    grid: &'a Grid<T>,
    // Flat visitation index; (row, col) is derived on the way out, so
    // the order is row-major independent of the storage layout.
    range: Range<usize>,
}

impl<'a, T> IndexedIter<'a, T> {
    #[inline]
    fn item(&self, i: usize) -> (usize, usize, &'a T)
    {
        let row = i / self.grid.width();
        let col = i % self.grid.width();
        (row, col, self.grid.at(row, col))
    }
}

impl<'a, T> Iterator for IndexedIter<'a, T> {
    type Item = (usize, usize, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item>
    {
        self.range.next().map(|i| self.item(i))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>)
    { (self.len(), Some(self.len())) }
}

impl<'a, T> DoubleEndedIterator for IndexedIter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item>
    {
        self.range.next_back().map(|i| self.item(i))
    }
}

impl<'a, T> ExactSizeIterator for IndexedIter<'a, T> {
    #[inline]
    fn len(&self) -> usize
    { self.range.len() }
}

impl<'a, T> ::std::iter::FusedIterator for IndexedIter<'a, T> { }

/// See [`Grid::row_iter`].
pub struct RowIter<'a, T> {
    grid: &'a Grid<T>,
    row: usize,
    cols: Range<usize>,
}

impl<'a, T> Iterator for RowIter<'a, T> {
    type Item = (usize, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item>
    {
        let row = self.row;
        self.cols.next().map(|col| (col, self.grid.at(row, col)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>)
    { (self.cols.len(), Some(self.cols.len())) }
}

impl<'a, T> ExactSizeIterator for RowIter<'a, T> { }

impl<'a, T> ::std::iter::FusedIterator for RowIter<'a, T> { }

/// See [`Grid::col_iter`].
pub struct ColIter<'a, T> {
    grid: &'a Grid<T>,
    col: usize,
    rows: Range<usize>,
}

impl<'a, T> Iterator for ColIter<'a, T> {
    type Item = (usize, &'a T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item>
    {
        let col = self.col;
        self.rows.next().map(|row| (row, self.grid.at(row, col)))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>)
    { (self.rows.len(), Some(self.rows.len())) }
}

impl<'a, T> ExactSizeIterator for ColIter<'a, T> { }

impl<'a, T> ::std::iter::FusedIterator for ColIter<'a, T> { }

// The cursor is a small state machine that only moves forward, or into
// Errored.  Once Errored it stays there: advance becomes a no-op
// returning false, and the first error remains queryable.
#[derive(Debug, Clone)]
enum CursorState {
    NotStarted,
    Positioned(usize),
    Errored(GridError),
}

impl CursorState {
    fn advance(&mut self, bound: usize) -> bool
    {
        let next = match *self {
            CursorState::NotStarted => 0,
            CursorState::Positioned(i) => i + 1,
            CursorState::Errored(_) => return false,
        };
        if next >= bound {
            // exhausted; stay put so that repeated calls keep
            // returning false instead of wrapping
            return false;
        }
        *self = CursorState::Positioned(next);
        true
    }

    fn latch(&mut self, err: GridError) -> GridError
    {
        *self = CursorState::Errored(err.clone());
        err
    }

    fn err(&self) -> Option<&GridError>
    {
        match self {
            CursorState::Errored(err) => Some(err),
            _ => None,
        }
    }
}

/// See [`Grid::rows`].
pub struct RowCursor<'a, T> {
    grid: &'a Grid<T>,
    state: CursorState,
}

impl<'a, T> RowCursor<'a, T> {
    /// Move to the next row.  Returns false once the rows are
    /// exhausted, or always after an error has been latched.
    pub fn advance(&mut self) -> bool
    {
        let height = self.grid.height();
        self.state.advance(height)
    }

    /// Copy the current row into `dest`, whose length must be exactly
    /// the grid's width.
    ///
    /// A failure here (wrong length, or no current row) is latched:
    /// every later call keeps returning the first error, and
    /// [`RowCursor::advance`] becomes a no-op.
    pub fn scan_into(&mut self, dest: &mut [T]) -> Result<(), GridError>
    where T: Clone,
    {
        let row = match self.state {
            CursorState::Errored(ref err) => return Err(err.clone()),
            CursorState::NotStarted => return Err(self.state.latch(GridError::ScanNotPositioned)),
            CursorState::Positioned(row) => row,
        };
        if dest.len() != self.grid.width() {
            throw!(self.state.latch(GridError::DestinationLength {
                len: dest.len(),
                expected: self.grid.width(),
            }));
        }
        self.grid.copy_row_into(row, dest);
        Ok(())
    }

    /// The first error encountered, if any.
    pub fn err(&self) -> Option<&GridError>
    { self.state.err() }
}

/// See [`Grid::cols`].
pub struct ColCursor<'a, T> {
    grid: &'a Grid<T>,
    state: CursorState,
}

impl<'a, T> ColCursor<'a, T> {
    /// Move to the next column.  Returns false once the columns are
    /// exhausted, or always after an error has been latched.
    pub fn advance(&mut self) -> bool
    {
        let width = self.grid.width();
        self.state.advance(width)
    }

    /// Copy the current column into `dest`, whose length must be
    /// exactly the grid's height.  Failures latch as in
    /// [`RowCursor::scan_into`].
    pub fn scan_into(&mut self, dest: &mut [T]) -> Result<(), GridError>
    where T: Clone,
    {
        let col = match self.state {
            CursorState::Errored(ref err) => return Err(err.clone()),
            CursorState::NotStarted => return Err(self.state.latch(GridError::ScanNotPositioned)),
            CursorState::Positioned(col) => col,
        };
        if dest.len() != self.grid.height() {
            throw!(self.state.latch(GridError::DestinationLength {
                len: dest.len(),
                expected: self.grid.height(),
            }));
        }
        self.grid.copy_col_into(col, dest);
        Ok(())
    }

    /// The first error encountered, if any.
    pub fn err(&self) -> Option<&GridError>
    { self.state.err() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Layout;

    fn numbered(height: usize, width: usize, layout: Layout) -> Grid<i32>
    {
        let mut grid = Grid::new(height, width, layout);
        for (r, c) in iproduct!(0..height, 0..width) {
            grid.set(r, c, (r * 10 + c) as i32).unwrap();
        }
        grid
    }

    #[test]
    fn indexed_iter_visits_in_row_major_order()
    {
        for &layout in &[Layout::RowMajor, Layout::ColMajor] {
            let grid = numbered(2, 3, layout);
            let visited: Vec<_> = grid.indexed_iter()
                .map(|(r, c, &v)| (r, c, v))
                .collect();
            assert_eq!(visited, vec![
                (0, 0, 0), (0, 1, 1), (0, 2, 2),
                (1, 0, 10), (1, 1, 11), (1, 2, 12),
            ]);
        }
    }

    #[test]
    fn indexed_iter_is_exact_and_fused()
    {
        let grid = numbered(3, 4, Layout::ColMajor);
        let mut it = grid.indexed_iter();
        assert_eq!(it.len(), 12);
        assert_eq!(it.by_ref().count(), 12);
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);

        // exhausted iterators are not restartable; a fresh one is
        assert_eq!(grid.indexed_iter().count(), 12);
    }

    #[test]
    fn indexed_iter_handles_empty_grids()
    {
        let grid: Grid<i32> = Grid::new(0, 5, Layout::RowMajor);
        assert_eq!(grid.indexed_iter().next(), None);
        let grid: Grid<i32> = Grid::new(5, 0, Layout::RowMajor);
        assert_eq!(grid.indexed_iter().next(), None);
    }

    #[test]
    fn row_iter_walks_one_row()
    {
        for &layout in &[Layout::RowMajor, Layout::ColMajor] {
            let grid = numbered(3, 3, layout);
            let row: Vec<_> = grid.row_iter(1).unwrap().map(|(c, &v)| (c, v)).collect();
            assert_eq!(row, vec![(0, 10), (1, 11), (2, 12)]);
        }
    }

    #[test]
    fn col_iter_walks_one_col()
    {
        for &layout in &[Layout::RowMajor, Layout::ColMajor] {
            let grid = numbered(3, 3, layout);
            let col: Vec<_> = grid.col_iter(2).unwrap().map(|(r, &v)| (r, v)).collect();
            assert_eq!(col, vec![(0, 2), (1, 12), (2, 22)]);
        }
    }

    #[test]
    fn lane_iters_fail_fast()
    {
        let grid = numbered(2, 3, Layout::RowMajor);
        assert_matches!(
            Err(GridError::OutOfBounds { coord: "row", index: 2, bound: 2 }),
            grid.row_iter(2).map(|_| ()));
        assert_matches!(
            Err(GridError::OutOfBounds { coord: "col", index: 3, bound: 3 }),
            grid.col_iter(3).map(|_| ()));
    }

    #[test]
    fn row_cursor_scans_every_row()
    {
        for &layout in &[Layout::RowMajor, Layout::ColMajor] {
            let grid = numbered(3, 2, layout);
            let mut cursor = grid.rows();
            let mut buf = vec![0; 2];
            let mut seen = Vec::new();
            while cursor.advance() {
                cursor.scan_into(&mut buf).unwrap();
                seen.push(buf.clone());
            }
            assert_eq!(seen, vec![vec![0, 1], vec![10, 11], vec![20, 21]]);
            assert!(cursor.err().is_none());
            // exhausted; keeps saying no
            assert!(!cursor.advance());
        }
    }

    #[test]
    fn col_cursor_scans_every_col()
    {
        for &layout in &[Layout::RowMajor, Layout::ColMajor] {
            let grid = numbered(2, 3, layout);
            let mut cursor = grid.cols();
            let mut buf = vec![0; 2];
            let mut seen = Vec::new();
            while cursor.advance() {
                cursor.scan_into(&mut buf).unwrap();
                seen.push(buf.clone());
            }
            assert_eq!(seen, vec![vec![0, 10], vec![1, 11], vec![2, 12]]);
        }
    }

    #[test]
    fn cursor_latches_destination_length_error()
    {
        let grid = numbered(3, 2, Layout::RowMajor);
        let mut cursor = grid.rows();
        assert!(cursor.advance());

        let mut wrong = vec![0; 5];
        assert_matches!(
            Err(GridError::DestinationLength { len: 5, expected: 2 }),
            cursor.scan_into(&mut wrong));

        // the latch is sticky: advance is dead, and even a correct
        // destination keeps surfacing the first error
        assert!(!cursor.advance());
        let mut right = vec![0; 2];
        assert_matches!(
            Err(GridError::DestinationLength { len: 5, expected: 2 }),
            cursor.scan_into(&mut right));
        assert_matches!(
            Some(&GridError::DestinationLength { len: 5, expected: 2 }),
            cursor.err());
    }

    #[test]
    fn cursor_rejects_scan_before_advance()
    {
        let grid = numbered(2, 2, Layout::RowMajor);
        let mut cursor = grid.cols();
        let mut buf = vec![0; 2];
        assert_matches!(Err(GridError::ScanNotPositioned), cursor.scan_into(&mut buf));
        assert!(!cursor.advance());
        assert_matches!(Some(&GridError::ScanNotPositioned), cursor.err());
    }
}
