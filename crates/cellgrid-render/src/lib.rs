//! Plain-text rendering of a sheet's occupied bounding box.

use cellgrid_core::{Cell, Position, Sheet};

/// Render every cell's *evaluated value* over the sheet's printable bounding
/// box, one tab-separated row per line. Unoccupied cells render as an empty
/// field; formula errors render as their `#...!` token, same as any other value.
pub fn print_values(sheet: &Sheet) -> String {
    render(sheet, |sheet, cell| cell.get_value(sheet).to_string())
}

/// Render every cell's *edit text* (the literal the user typed, with `=`
/// restored for formulas) over the same bounding box as `print_values`.
pub fn print_texts(sheet: &Sheet) -> String {
    render(sheet, |_sheet, cell| cell.get_text())
}

/// Walks the printable rectangle through `Sheet::get_cell`, the same entry
/// point an external renderer is expected to use (an unoccupied position
/// yields `None` and renders as an empty field).
fn render(sheet: &Sheet, cell_text: impl Fn(&Sheet, &Cell) -> String) -> String {
    let size = sheet.printable_size();
    let mut out = String::new();
    for row in 0..size.rows {
        if row > 0 {
            out.push('\n');
        }
        for col in 0..size.cols {
            if col > 0 {
                out.push('\t');
            }
            let pos = Position::new(row, col);
            let cell = sheet
                .get_cell(pos)
                .expect("a position within printable_size is always in range");
            if let Some(cell) = cell {
                out.push_str(&cell_text(sheet, cell));
            }
        }
    }
    out
}
