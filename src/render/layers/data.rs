//! Data cells: row text for resident rows, placeholders for the rest.

use super::{text_anchor, HAIRLINE};
use crate::layout::{content_height, RowRange};
use crate::render::colors::palette;
use crate::render::layer::Frame;
use crate::render::surface::{Surface, TextStyle};

pub fn draw(surface: &mut dyn Surface, frame: &Frame<'_>) {
    let Some(rows) = frame
        .viewport
        .visible_rows(frame.scroll.scroll_y, frame.options.row_height, frame.total_rows)
    else {
        return;
    };

    surface.save();
    surface.translate(-frame.scroll.scroll_x, -frame.scroll.scroll_y);
    draw_rows(surface, frame, rows);
    if frame.options.show_grid {
        draw_grid(surface, frame, rows);
    }
    surface.restore();
}

fn draw_rows(surface: &mut dyn Surface, frame: &Frame<'_>, rows: RowRange) {
    let row_height = frame.options.row_height;
    let theme = &frame.options.theme;
    let cols = frame.viewport.visible_cols(frame.scroll.scroll_x, frame.columns);

    for index in rows.iter() {
        let y = index as f64 * row_height;
        let Some(row) = frame.rows.row(index) else {
            surface.fill_rect(
                frame.scroll.scroll_x,
                y,
                frame.viewport.width,
                row_height,
                palette::PLACEHOLDER,
            );
            continue;
        };
        let Some((first, last)) = cols else {
            continue;
        };
        for (col, column, x, w) in frame.columns.iter() {
            if col < first || col > last {
                continue;
            }
            let text = row.text(&column.key);
            if text.is_empty() {
                continue;
            }
            let (text_x, align) = text_anchor(x, w, column.align);
            let style = TextStyle {
                font: theme.font.clone(),
                color: theme.text_color.clone(),
                align,
            };
            surface.fill_text(&text, text_x, y + row_height / 2.0, &style);
        }
    }
}

fn draw_grid(surface: &mut dyn Surface, frame: &Frame<'_>, rows: RowRange) {
    let row_height = frame.options.row_height;
    let color = &frame.options.theme.grid_color;
    let total_width = frame.columns.total_width();
    let top = frame.scroll.scroll_y;
    let bottom = (top + frame.viewport.height).min(content_height(frame.total_rows, row_height));

    for (_, _, x, w) in frame.columns.iter() {
        let edge = x + w - HAIRLINE;
        surface.stroke_line(edge, top, edge, bottom, color);
    }
    for index in rows.start..=rows.end + 1 {
        let y = index as f64 * row_height + HAIRLINE;
        surface.stroke_line(0.0, y, total_width, y, color);
    }
}
