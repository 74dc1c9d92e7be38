use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// A widget for displaying the pause pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused;

impl Paused {
    /// The height that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const HEIGHT: u16 = 4;

    /// The width that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const WIDTH: u16 = 32;
}

impl Widget for Paused {
    /*
     * ┌─────────── PAUSED ───────────┐
     * │ Game saved.                  │
     * │ Press any key to continue.   │
     * └──────────────────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        let lines = [
            Line::raw("Game saved."),
            Line::from_iter([
                Span::raw("Press "),
                Span::styled("any key", consts::KEY_STYLE),
                Span::raw(" to continue."),
            ]),
        ];
        for (line, row) in lines.into_iter().zip(inner.rows()) {
            line.render(row, buf);
        }
    }
}
