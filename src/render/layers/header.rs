//! Column header band: fixed vertically, scrolls horizontally.

use super::{text_anchor, HAIRLINE};
use crate::layout::Viewport;
use crate::render::layer::Frame;
use crate::render::surface::{Surface, TextStyle};

/// Draw titles and separators into the header band of size `band`.
pub fn draw(surface: &mut dyn Surface, frame: &Frame<'_>, band: Viewport) {
    let options = frame.options;
    if !options.show_header || band.height <= 0.0 {
        return;
    }
    let theme = &options.theme;
    let height = band.height;

    surface.save();
    surface.clip_rect(0.0, 0.0, band.width, height);
    surface.fill_rect(0.0, 0.0, band.width, height, &theme.header_background_color);
    surface.stroke_line(0.0, height - HAIRLINE, band.width, height - HAIRLINE, &theme.border_color);

    surface.translate(-frame.scroll.scroll_x, 0.0);
    let visible = Viewport::new(band.width, height).visible_cols(frame.scroll.scroll_x, frame.columns);
    if let Some((first, last)) = visible {
        for (col, column, x, w) in frame.columns.iter() {
            if col < first || col > last {
                continue;
            }
            let (text_x, align) = text_anchor(x, w, column.align);
            let style = TextStyle {
                font: theme.header_font.clone(),
                color: theme.header_text_color.clone(),
                align,
            };
            surface.fill_text(&column.title, text_x, height / 2.0, &style);
            let edge = x + w - HAIRLINE;
            surface.stroke_line(edge, 0.0, edge, height, &theme.grid_color);
        }
    }
    surface.restore();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::GridOptions;
    use crate::layout::{ColumnLayout, ScrollState};
    use crate::render::{CommandLog, DrawCommand, RecordingSurface};
    use crate::types::{Align, Column, Row};
    use std::rc::Rc;

    fn record(options: &GridOptions, scroll: ScrollState) -> Vec<DrawCommand> {
        let columns = ColumnLayout::new(vec![
            Column::new("a", 100.0).titled("Name"),
            Column::new("b", 100.0).titled("Score").aligned(Align::Right),
            Column::new("c", 100.0).titled("Notes"),
        ]);
        let rows: Vec<Rc<Row>> = Vec::new();
        let frame = Frame {
            options,
            viewport: options.data_viewport(),
            scroll,
            columns: &columns,
            rows: &rows,
            total_rows: 0,
        };
        let log: CommandLog = Rc::default();
        let mut surface = RecordingSurface::new(Rc::clone(&log));
        draw(&mut surface, &frame, options.header_viewport());
        let commands = log.borrow().clone();
        commands
    }

    fn titles(commands: &[DrawCommand]) -> Vec<(String, f64)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, x, .. } => Some((text.clone(), *x)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn titles_are_aligned_and_clipped_to_band() {
        let options = GridOptions {
            width: 150.0,
            ..GridOptions::default()
        };
        let commands = record(&options, ScrollState::ORIGIN);
        assert!(commands.contains(&DrawCommand::Clip { x: 0.0, y: 0.0, w: 150.0, h: 40.0 }));
        assert_eq!(titles(&commands), vec![("Name".to_string(), 10.0), ("Score".to_string(), 190.0)]);
    }

    #[test]
    fn horizontal_scroll_translates_only_x() {
        let options = GridOptions {
            width: 150.0,
            ..GridOptions::default()
        };
        let commands = record(&options, ScrollState::new(120.0, 900.0));
        assert!(commands.contains(&DrawCommand::Translate { dx: -120.0, dy: 0.0 }));
        assert_eq!(titles(&commands).len(), 2);
    }

    #[test]
    fn hidden_header_draws_nothing() {
        let options = GridOptions {
            show_header: false,
            ..GridOptions::default()
        };
        assert!(record(&options, ScrollState::ORIGIN).is_empty());
    }
}
