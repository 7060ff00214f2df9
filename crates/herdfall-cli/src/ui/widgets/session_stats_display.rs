use herdfall_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Paragraph, Widget},
};

use crate::ui::widgets::style;

/// Inner width of the panel in terminal columns.
const WIDTH: u16 = 20;

/// Score, progress and best-group panel.
pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cell_count(self.lines().len()) + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let stats = self.session.stats();
        let best = self.session.best_group().map_or_else(
            || "-".to_owned(),
            |(animal, size)| format!("{size} {} ({})", animal.label(), animal.group_name()),
        );
        vec![
            Line::from("SCORE:"),
            Line::from(stats.score().to_string()).right_aligned(),
            Line::default(),
            spread("LEVEL:", &stats.level().to_string()),
            spread("LOCKS:", &stats.locks().to_string()),
            spread("CLEARS:", &stats.regions_cleared().to_string()),
            spread("SPEED:", &format!("{}ms", stats.fall_interval_ms())),
            Line::default(),
            Line::from("BEST GROUP:"),
            Line::from(best).right_aligned(),
        ]
    }
}

/// Label on the left, value pushed to the right edge of the panel.
fn spread(label: &str, value: &str) -> Line<'static> {
    let gap = usize::from(WIDTH).saturating_sub(label.len() + value.len());
    Line::from(format!("{label}{}{value}", " ".repeat(gap.max(1))))
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        Paragraph::new(self.lines())
            .style(style::DEFAULT)
            .render(area, buf);
    }
}
