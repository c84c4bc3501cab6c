use crate::GridError;

use ::std::borrow::Cow;
use ::std::ops::{Deref, DerefMut};

/// Storage order of a [`Grid`]'s flat buffer.
///
/// This is the capability switch behind every view-producing method:
/// the axis that is contiguous under the layout can be borrowed as a
/// real slice, while the strided axis is handed out as a copy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// Each row occupies a contiguous run of `width` elements;
    /// columns are strided by `width`.
    RowMajor,
    /// Each column occupies a contiguous run of `height` elements;
    /// rows are strided by `height`.
    ColMajor,
}

impl Layout {
    /// Translate `(row, col)` into an offset into the flat buffer.
    ///
    /// This is the single source of truth for address translation;
    /// every accessor in the crate funnels through it.
    #[inline(always)]
    pub(crate) fn offset(self, row: usize, col: usize, height: usize, width: usize) -> usize
    {
        match self {
            Layout::RowMajor => col + row * width,
            Layout::ColMajor => row + col * height,
        }
    }

    /// True when a full row is one contiguous run of storage.
    #[inline]
    pub fn rows_contiguous(self) -> bool
    { self == Layout::RowMajor }

    /// True when a full column is one contiguous run of storage.
    #[inline]
    pub fn cols_contiguous(self) -> bool
    { self == Layout::ColMajor }
}

/// A dense `height x width` array stored in one flat buffer.
///
/// Dimensions and layout are fixed at construction; the buffer never
/// resizes, and `len() == height * width` always holds.  `Clone` deep
/// copies the buffer, producing a fully independent grid.
///
/// Index policy: pure lookups (`get`, `row`, `col`, ...) return
/// `Option`, and every mutating or multi-coordinate operation returns
/// `Result` with a [`GridError`] naming the offending coordinate.
/// No method panics on a bad index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    height: usize,
    width: usize,
    data: Vec<T>,
    layout: Layout,
}

#[inline]
pub(crate) fn check(coord: &'static str, index: usize, bound: usize) -> Result<(), GridError>
{
    match index < bound {
        true => Ok(()),
        false => Err(GridError::OutOfBounds { coord, index, bound }),
    }
}

/// Fill a slice with clones of `value` by exponential copying: one
/// write, then O(log n) doublings of the already-filled prefix.
pub(crate) fn fill_doubling<T: Clone>(slice: &mut [T], value: T)
{
    if slice.is_empty() {
        return;
    }
    slice[0] = value;
    let mut filled = 1;
    while filled < slice.len() {
        let (src, rest) = slice.split_at_mut(filled);
        let take = ::std::cmp::min(src.len(), rest.len());
        rest[..take].clone_from_slice(&src[..take]);
        filled += take;
    }
}

impl<T> Grid<T> {
    /// Create a grid of default-initialized elements.
    pub fn new(height: usize, width: usize, layout: Layout) -> Grid<T>
    where T: Default,
    {
        let data = (0..height * width).map(|_| T::default()).collect();
        Grid { height, width, data, layout }
    }

    /// Create a grid with every cell set to `value`.
    ///
    /// Uses exponential copying, so large grids cost O(log n) bulk
    /// copies rather than n individual clones.
    pub fn filled(height: usize, width: usize, value: T, layout: Layout) -> Grid<T>
    where T: Clone,
    {
        let len = height * width;
        let mut data = Vec::with_capacity(len);
        if len > 0 {
            data.push(value);
            while data.len() < len {
                let take = ::std::cmp::min(data.len(), len - data.len());
                data.extend_from_within(..take);
            }
        }
        Grid { height, width, data, layout }
    }

    /// Adopt a flat buffer as grid storage, without copying.
    ///
    /// The buffer is interpreted according to `layout`.  It can be
    /// recovered (or inspected in place) through [`Grid::into_flat`],
    /// [`Grid::as_flat_slice`] and [`Grid::as_flat_mut_slice`]; this
    /// zero-copy adoption is a first-class part of the contract, not
    /// an implementation detail.
    ///
    /// Fails with [`GridError::BufferLength`] when the length is not
    /// exactly `height * width`.
    pub fn from_flat(height: usize, width: usize, data: Vec<T>, layout: Layout)
    -> Result<Grid<T>, GridError>
    {
        if data.len() != height * width {
            throw!(GridError::BufferLength {
                len: data.len(),
                expected: height * width,
            });
        }
        Ok(Grid { height, width, data, layout })
    }

    /// Build a grid from variable-length rows.
    ///
    /// Rows shorter than `width` (and a row count shorter than
    /// `height`) are padded with default values; that is not an error.
    /// Fails with [`GridError::TooManyRows`] or [`GridError::RowTooLong`]
    /// when the input exceeds the declared dimensions.
    pub fn from_jagged(height: usize, width: usize, rows: Vec<Vec<T>>, layout: Layout)
    -> Result<Grid<T>, GridError>
    where T: Default + Clone,
    {
        if rows.len() > height {
            throw!(GridError::TooManyRows { rows: rows.len(), height });
        }
        let mut grid = Grid::new(height, width, layout);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                throw!(GridError::RowTooLong { row: r, len: row.len(), width });
            }
            if grid.layout.rows_contiguous() {
                let start = grid.index_of(r, 0);
                grid.data[start..start + row.len()].clone_from_slice(&row);
            } else {
                for (c, value) in row.into_iter().enumerate() {
                    let i = grid.index_of(r, c);
                    grid.data[i] = value;
                }
            }
        }
        trace!("built {}x{} grid from jagged input", height, width);
        Ok(grid)
    }

    /// Number of rows.  The maximum row index is `height() - 1`.
    #[inline]
    pub fn height(&self) -> usize
    { self.height }

    /// Number of columns.  The maximum column index is `width() - 1`.
    #[inline]
    pub fn width(&self) -> usize
    { self.width }

    /// The storage order chosen at construction.
    #[inline]
    pub fn layout(&self) -> Layout
    { self.layout }

    /// Total number of elements, always `height() * width()`.
    #[inline]
    pub fn len(&self) -> usize
    { self.data.len() }

    #[inline]
    pub fn is_empty(&self) -> bool
    { self.data.is_empty() }

    /// The flat backing buffer, in storage order.
    #[inline]
    pub fn as_flat_slice(&self) -> &[T]
    { &self.data }

    /// Mutable access to the flat backing buffer, in storage order.
    #[inline]
    pub fn as_flat_mut_slice(&mut self) -> &mut [T]
    { &mut self.data }

    /// Consume the grid, returning the flat buffer it adopted or
    /// allocated.  Inverse of [`Grid::from_flat`].
    #[inline]
    pub fn into_flat(self) -> Vec<T>
    { self.data }

    #[inline]
    fn index_of(&self, row: usize, col: usize) -> usize
    { self.layout.offset(row, col, self.height, self.width) }

    // Only for use after bounds have been established.
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> &T
    { &self.data[self.index_of(row, col)] }

    /// Look up one element.  `None` when either index is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T>
    {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(&self.data[self.index_of(row, col)])
    }

    /// Mutable counterpart of [`Grid::get`].
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T>
    {
        if row >= self.height || col >= self.width {
            return None;
        }
        let i = self.index_of(row, col);
        Some(&mut self.data[i])
    }

    /// Write one element, reporting which coordinate was bad on failure.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), GridError>
    {
        check("col", col, self.width)?;
        check("row", row, self.height)?;
        let i = self.index_of(row, col);
        self.data[i] = value;
        Ok(())
    }

    /// View one row.
    ///
    /// Borrowed (aliasing storage) when rows are contiguous under the
    /// layout, otherwise an owned copy.  `None` for a bad index.
    pub fn row(&self, row: usize) -> Option<Cow<'_, [T]>>
    where T: Clone,
    {
        if row >= self.height {
            return None;
        }
        Some(self.row_view(row))
    }

    /// View one column.  Mirror image of [`Grid::row`]: borrowed under
    /// column-major layout, an owned copy under row-major.
    pub fn col(&self, col: usize) -> Option<Cow<'_, [T]>>
    where T: Clone,
    {
        if col >= self.width {
            return None;
        }
        Some(self.col_view(col))
    }

    fn row_view(&self, row: usize) -> Cow<'_, [T]>
    where T: Clone,
    {
        if self.layout.rows_contiguous() {
            let start = self.index_of(row, 0);
            Cow::Borrowed(&self.data[start..start + self.width])
        } else {
            Cow::Owned((0..self.width).map(|c| self.at(row, c).clone()).collect())
        }
    }

    fn col_view(&self, col: usize) -> Cow<'_, [T]>
    where T: Clone,
    {
        if self.layout.cols_contiguous() {
            let start = self.index_of(0, col);
            Cow::Borrowed(&self.data[start..start + self.height])
        } else {
            Cow::Owned((0..self.height).map(|r| self.at(r, col).clone()).collect())
        }
    }

    /// Mutable view of one row.
    ///
    /// Under row-major layout this is [`Lane::Aliased`] and writes land
    /// in the grid; under column-major it is a detached [`Lane::Copied`]
    /// and writes do not propagate back.
    pub fn row_mut(&mut self, row: usize) -> Option<Lane<'_, T>>
    where T: Clone,
    {
        if row >= self.height {
            return None;
        }
        if self.layout.rows_contiguous() {
            let start = self.index_of(row, 0);
            let width = self.width;
            Some(Lane::Aliased(&mut self.data[start..start + width]))
        } else {
            Some(Lane::Copied((0..self.width).map(|c| self.at(row, c).clone()).collect()))
        }
    }

    /// Mutable view of one column.  Mirror image of [`Grid::row_mut`]:
    /// aliasing under column-major layout, detached under row-major.
    pub fn col_mut(&mut self, col: usize) -> Option<Lane<'_, T>>
    where T: Clone,
    {
        if col >= self.width {
            return None;
        }
        if self.layout.cols_contiguous() {
            let start = self.index_of(0, col);
            let height = self.height;
            Some(Lane::Aliased(&mut self.data[start..start + height]))
        } else {
            Some(Lane::Copied((0..self.height).map(|r| self.at(r, col).clone()).collect()))
        }
    }

    /// Borrow the contiguous stretch of one row between two column
    /// indices (inclusive, order-independent).
    ///
    /// Row spans only exist as slices under row-major layout; a
    /// column-major grid fails with [`GridError::SpanNotContiguous`].
    pub fn row_span(&self, row: usize, col1: usize, col2: usize) -> Result<&[T], GridError>
    {
        let (start, len) = self.span_range(row, col1, col2)?;
        Ok(&self.data[start..start + len])
    }

    /// Mutable counterpart of [`Grid::row_span`].  Writes through the
    /// slice land directly in grid storage.
    pub fn row_span_mut(&mut self, row: usize, col1: usize, col2: usize)
    -> Result<&mut [T], GridError>
    {
        let (start, len) = self.span_range(row, col1, col2)?;
        Ok(&mut self.data[start..start + len])
    }

    fn span_range(&self, row: usize, col1: usize, col2: usize)
    -> Result<(usize, usize), GridError>
    {
        check("row", row, self.height)?;
        check("col1", col1, self.width)?;
        check("col2", col2, self.width)?;
        if !self.layout.rows_contiguous() {
            throw!(GridError::SpanNotContiguous { row, col1, col2 });
        }
        let (lo, hi) = if col1 <= col2 { (col1, col2) } else { (col2, col1) };
        Ok((self.index_of(row, lo), hi - lo + 1))
    }

    /// Set every element of the inclusive rectangle spanned by the two
    /// corners to `value`.  The corners may be given in any order.
    ///
    /// Under row-major layout the first row of the region is filled by
    /// exponential copying and then duplicated into the remaining rows;
    /// under column-major the region is strided, so it is written
    /// cell by cell.
    pub fn fill(&mut self, row1: usize, col1: usize, row2: usize, col2: usize, value: T)
    -> Result<(), GridError>
    where T: Clone,
    {
        check("col1", col1, self.width)?;
        check("row1", row1, self.height)?;
        check("col2", col2, self.width)?;
        check("row2", row2, self.height)?;
        let (row1, row2) = if row1 <= row2 { (row1, row2) } else { (row2, row1) };
        let (col1, col2) = if col1 <= col2 { (col1, col2) } else { (col2, col1) };
        trace!("fill rows {}..={}, cols {}..={}", row1, row2, col1, col2);

        if !self.layout.rows_contiguous() {
            for (r, c) in iproduct!(row1..=row2, col1..=col2) {
                let i = self.index_of(r, c);
                self.data[i] = value.clone();
            }
            return Ok(());
        }

        let len = col2 - col1 + 1;
        let first = self.index_of(row1, col1);
        fill_doubling(&mut self.data[first..first + len], value);
        for row in row1 + 1..=row2 {
            let dest = self.index_of(row, col1);
            // `first + len <= dest` because `row > row1`, so the filled
            // template lands entirely in `head`.
            let (head, tail) = self.data.split_at_mut(dest);
            tail[..len].clone_from_slice(&head[first..first + len]);
        }
        Ok(())
    }

    /// Produce a new grid by applying `transform` to every element, in
    /// row-major visitation order.  Dimensions and layout carry over;
    /// the source is untouched.
    pub fn map<U, F>(&self, mut transform: F) -> Grid<U>
    where F: FnMut(&T) -> U,
    {
        // Mapping the buffer in storage order preserves every
        // element's (row, col) position under the shared layout.
        Grid {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(|x| transform(x)).collect(),
            layout: self.layout,
        }
    }

    /// All rows, top to bottom, as read-only views.  Under row-major
    /// layout the views borrow storage; otherwise each is an
    /// independent copy.
    pub fn to_rows(&self) -> Vec<Cow<'_, [T]>>
    where T: Clone,
    {
        (0..self.height).map(|r| self.row_view(r)).collect()
    }

    /// All columns, left to right, as read-only views.  Mirror image
    /// of [`Grid::to_rows`].
    pub fn to_cols(&self) -> Vec<Cow<'_, [T]>>
    where T: Clone,
    {
        (0..self.width).map(|c| self.col_view(c)).collect()
    }

    // Lane copies for the cursor API; destination length is the
    // caller's responsibility.
    pub(crate) fn copy_row_into(&self, row: usize, dest: &mut [T])
    where T: Clone,
    {
        debug_assert_eq!(dest.len(), self.width);
        if self.layout.rows_contiguous() {
            let start = self.index_of(row, 0);
            dest.clone_from_slice(&self.data[start..start + self.width]);
        } else {
            for c in 0..self.width {
                dest[c] = self.at(row, c).clone();
            }
        }
    }

    pub(crate) fn copy_col_into(&self, col: usize, dest: &mut [T])
    where T: Clone,
    {
        debug_assert_eq!(dest.len(), self.height);
        if self.layout.cols_contiguous() {
            let start = self.index_of(0, col);
            dest.clone_from_slice(&self.data[start..start + self.height]);
        } else {
            for r in 0..self.height {
                dest[r] = self.at(r, col).clone();
            }
        }
    }
}

/// A mutable row or column view.
///
/// Whether the lane aliases grid storage is decided once by the grid's
/// [`Layout`]: the contiguous axis is handed out by reference, the
/// strided axis as a detached copy.  Both variants deref to `[T]`.
#[derive(Debug)]
pub enum Lane<'a, T> {
    /// Borrows grid storage; writes are visible through the grid.
    Aliased(&'a mut [T]),
    /// An independent copy; writes do not reach the grid.
    Copied(Vec<T>),
}

impl<'a, T> Lane<'a, T> {
    /// True when writes through this lane land in the grid.
    pub fn is_aliased(&self) -> bool
    {
        match self {
            Lane::Aliased(_) => true,
            Lane::Copied(_) => false,
        }
    }
}

impl<'a, T> Deref for Lane<'a, T> {
    type Target = [T];

    fn deref(&self) -> &[T]
    {
        match self {
            Lane::Aliased(xs) => xs,
            Lane::Copied(xs) => xs,
        }
    }
}

impl<'a, T> DerefMut for Lane<'a, T> {
    fn deref_mut(&mut self) -> &mut [T]
    {
        match self {
            Lane::Aliased(xs) => xs,
            Lane::Copied(xs) => xs,
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{ser, de, Deserialize, Serialize};

    #[derive(Serialize)]
    struct RawGridRef<'a, T> {
        height: usize,
        width: usize,
        layout: Layout,
        data: &'a [T],
    }

    #[derive(Deserialize)]
    struct RawGrid<T> {
        height: usize,
        width: usize,
        layout: Layout,
        data: Vec<T>,
    }

    impl<T: Serialize> Serialize for Grid<T> {
        fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            RawGridRef {
                height: self.height,
                width: self.width,
                layout: self.layout,
                data: &self.data,
            }.serialize(serializer)
        }
    }

    // Deserialization re-validates the length invariant instead of
    // trusting the wire.
    impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid<T> {
        fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = RawGrid::deserialize(deserializer)?;
            Grid::from_flat(raw.height, raw.width, raw.data, raw.layout)
                .map_err(de::Error::custom)
        }
    }
}
