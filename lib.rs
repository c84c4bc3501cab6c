//! A dense two-dimensional array backed by a single flat `Vec`.
//!
//! The star of the show is [`Grid`], which stores a `height x width`
//! rectangle of elements in one contiguous allocation, in either
//! row-major or column-major order ([`Layout`]).  Rows or columns that
//! are contiguous under the chosen layout can be borrowed as real
//! slices; the other axis is handed out as a copy.
//!
//! Nothing here panics on a bad index.  Lookups return `Option`, and
//! every operation with a richer failure mode returns a [`GridError`]
//! that names the offending coordinate or length.

#[macro_use] extern crate failure;
#[macro_use] extern crate itertools;
#[macro_use] extern crate log;
#[cfg(feature = "serde")] extern crate serde;
#[cfg(test)] extern crate rand;

// FIXME copied from failure 1.0 prerelease; remove once actually released
macro_rules! throw {
    ($e:expr) => {
        return Err(::std::convert::Into::into($e));
    }
}

#[cfg(test)]
macro_rules! assert_matches {
    ($pat:pat, $expr:expr,)
    => { assert_matches!($pat, $expr) };
    ($pat:pat, $expr:expr)
    => { assert_matches!($pat, $expr, "actual {:?}", $expr) };
    ($pat:pat, $expr:expr, $($arg:expr),+ $(,)*)
    => {
        match $expr {
            $pat => {},
            _ => panic!(
                "assertion failed: {} ({})",
                stringify!(assert_matches!($pat, $expr)),
                format_args!($($arg),+))
        }
    };
}

mod grid;
mod iter;
mod fmt;

//---------------------------
// public reexports; API

pub use crate::grid::{Grid, Lane, Layout};
pub use crate::iter::{ColCursor, ColIter, IndexedIter, RowCursor, RowIter};

/// The error type for every fallible `Grid` operation.
///
/// All variants are recoverable conditions reported to the immediate
/// caller; nothing in this crate aborts on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Fail)]
pub enum GridError {
    /// A flat buffer's length does not match `height * width`.
    #[fail(display = "buffer length {} does not match height*width = {}", len, expected)]
    BufferLength { len: usize, expected: usize },

    /// A jagged input has more rows than the declared height.
    #[fail(display = "jagged input has {} rows, exceeding height {}", rows, height)]
    TooManyRows { rows: usize, height: usize },

    /// A row of a jagged input is longer than the declared width.
    #[fail(display = "jagged row {} has length {}, exceeding width {}", row, len, width)]
    RowTooLong { row: usize, len: usize, width: usize },

    /// An index lies outside the grid.  `coord` names the offending
    /// argument (`"row"`, `"col"`, or a fill corner like `"row2"`).
    #[fail(display = "{} index {} out of range for bound {}", coord, index, bound)]
    OutOfBounds { coord: &'static str, index: usize, bound: usize },

    /// A row span was requested on a layout where rows are strided.
    #[fail(display = "row {} span {}..={} is not contiguous under column-major layout",
        row, col1, col2)]
    SpanNotContiguous { row: usize, col1: usize, col2: usize },

    /// A cursor scan destination has the wrong length.
    #[fail(display = "scan destination has length {}, but the lane length is {}",
        len, expected)]
    DestinationLength { len: usize, expected: usize },

    /// A cursor scan was attempted with no current lane.
    #[fail(display = "scan called before advance, or after the cursor was exhausted")]
    ScanNotPositioned,
}
