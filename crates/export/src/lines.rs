//! Plain-text line list: one segment per line, `x0,y0;x1,y1`.
//!
//! Coordinates are narrowed to `f32` and printed in shortest round-trip form
//! with a trailing `.0` on whole numbers.

use std::fmt::Write as _;
use std::path::Path;

use flowfield_core::error::FlowError;
use flowfield_core::geometry::Line;

/// Formats `lines` in order, each terminated by `\n`.
pub fn format_line_list(lines: &[Line]) -> String {
    let mut out = String::with_capacity(lines.len() * 32);
    for line in lines {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{:?},{:?};{:?},{:?}",
            line.start.x as f32, line.start.y as f32, line.end.x as f32, line.end.y as f32
        );
    }
    out
}

pub fn write_line_list(lines: &[Line], path: &Path) -> Result<(), FlowError> {
    std::fs::write(path, format_line_list(lines)).map_err(|e| FlowError::Io(e.to_string()))
}
