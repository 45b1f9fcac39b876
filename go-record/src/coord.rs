//! Point encodings: SGF two-letter points (`"cd"`), human vertices (`"D4"`)
//! and zero-based `(x, y)` pairs.

use crate::Point;

/// Column letters for human vertices. `I` is skipped by convention.
const HUMAN_COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// SGF letter to 0-based index: a=0 .. z=25, A=26 .. Z=51.
fn letter_to_coord(ch: u8) -> Option<u8> {
    match ch {
        b'a'..=b'z' => Some(ch - b'a'),
        b'A'..=b'Z' => Some(ch - b'A' + 26),
        _ => None,
    }
}

fn coord_to_letter(c: u8) -> char {
    if c < 26 {
        (b'a' + c) as char
    } else {
        (b'A' + c - 26) as char
    }
}

/// Decode an SGF point on a board of the given size.
///
/// Anything that does not name an on-board point (empty, one character,
/// unknown letters, `tt` on 19x19) is a pass and yields `None`.
/// Characters after the first two are ignored.
pub fn point_from_sgf(s: &str, size: u8) -> Option<Point> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }
    let x = letter_to_coord(bytes[0])?;
    let y = letter_to_coord(bytes[1])?;
    (x < size && y < size).then_some((x, y))
}

/// Encode a point as SGF letters. Coordinates must be below 52.
pub fn sgf_from_point((x, y): Point) -> String {
    let mut s = String::with_capacity(2);
    s.push(coord_to_letter(x));
    s.push(coord_to_letter(y));
    s
}

/// Encode a point as a human vertex, e.g. `(3, 15)` on 19x19 is `"D4"`.
///
/// Returns `None` for columns beyond `Z` (boards wider than 25) or
/// points off the board.
pub fn human_from_point((x, y): Point, size: u8) -> Option<String> {
    if x >= size || y >= size {
        return None;
    }
    let column = *HUMAN_COLUMNS.get(x as usize)? as char;
    Some(format!("{column}{}", size - y))
}

/// Decode a human vertex (`"A19"`, `"q16"` is rejected, letters must be uppercase).
pub fn point_from_human(s: &str, size: u8) -> Option<Point> {
    let bytes = s.as_bytes();
    if !(2..=3).contains(&bytes.len()) {
        return None;
    }
    let x = HUMAN_COLUMNS.iter().position(|&c| c == bytes[0])? as u8;
    if !bytes[1..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let row: u8 = s[1..].parse().ok()?;
    if row == 0 || row > size || x >= size {
        return None;
    }
    Some((x, size - row))
}
