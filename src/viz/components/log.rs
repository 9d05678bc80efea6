use ratatui::{prelude::*, widgets::*};
use tui_logger::TuiLoggerWidget;

/// Pane showing records sent to the `log` facade
///
/// Only populated when `tui_logger` is the installed logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logs;

impl Widget for Logs {
    fn render(self, area: Rect, buf: &mut Buffer) {
        TuiLoggerWidget::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Logs"),
            )
            .style(Style::default().white())
            .style_error(Style::default().light_red())
            .style_warn(Style::default().light_yellow())
            .style_info(Style::default().cyan())
            .output_separator(' ')
            .output_target(false)
            .output_file(false)
            .output_line(false)
            .render(area, buf);
    }
}
