//! Character cells a [`DString`](crate::DString) can be built from.
//!
//! A cell is one fixed-width character unit. Narrow buffers store `u8`, wide
//! buffers store [`WideChar`] (the platform's `wchar_t`), and `char` is
//! available for buffers of Unicode scalar values. The only requirements are a
//! terminator value (`0`) and a fill value (`' '`) used to blank cleared or
//! freshly opened regions.
use alloc::string::String;
use core::{char::REPLACEMENT_CHARACTER, fmt};

use bstr::BStr;

/// One character-sized storage cell.
pub trait CharCell: Copy + Eq + fmt::Debug + 'static {
    /// The sentinel written after the last logical cell.
    const TERMINATOR: Self;
    /// The blank written into cleared storage and gaps opened by a shift.
    const FILL: Self;

    /// Decode `cells` to text, substituting U+FFFD for anything that is not a
    /// valid character.
    fn decode_lossy(cells: &[Self]) -> String;

    /// Render `cells` as a quoted, escaped string.
    fn fmt_debug(cells: &[Self], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(Self::decode_lossy(cells).as_str(), f)
    }

    /// Render `cells` as plain text.
    fn fmt_display(cells: &[Self], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::decode_lossy(cells))
    }
}

/// The cell type of a platform `wchar_t`.
#[cfg(windows)]
pub type WideChar = u16;
/// The cell type of a platform `wchar_t`.
#[cfg(not(windows))]
pub type WideChar = u32;

impl CharCell for u8 {
    const TERMINATOR: Self = 0;
    const FILL: Self = b' ';

    fn decode_lossy(cells: &[Self]) -> String {
        String::from_utf8_lossy(cells).into_owned()
    }

    // Arbitrary bytes are common here, so defer to bstr which escapes invalid
    // sequences byte by byte instead of collapsing them to U+FFFD.
    fn fmt_debug(cells: &[Self], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(BStr::new(cells), f)
    }

    fn fmt_display(cells: &[Self], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(BStr::new(cells), f)
    }
}

impl CharCell for u16 {
    const TERMINATOR: Self = 0;
    const FILL: Self = 0x20;

    fn decode_lossy(cells: &[Self]) -> String {
        char::decode_utf16(cells.iter().copied())
            .map(|c| c.unwrap_or(REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl CharCell for u32 {
    const TERMINATOR: Self = 0;
    const FILL: Self = 0x20;

    fn decode_lossy(cells: &[Self]) -> String {
        cells
            .iter()
            .map(|&c| char::from_u32(c).unwrap_or(REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl CharCell for char {
    const TERMINATOR: Self = '\0';
    const FILL: Self = ' ';

    fn decode_lossy(cells: &[Self]) -> String {
        cells.iter().collect()
    }
}

/// Number of cells before the first terminator, or the whole slice when it
/// has none.
pub(crate) fn terminated_len<C: CharCell>(cells: &[C]) -> usize {
    cells
        .iter()
        .position(|&c| c == C::TERMINATOR)
        .unwrap_or(cells.len())
}
