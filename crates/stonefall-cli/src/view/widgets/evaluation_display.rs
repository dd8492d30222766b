use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use stonefall_evaluator::heuristic::BoardEvaluation;

use crate::view::widgets::style;

/// Heuristic evaluation of the board, taken at the latest spawn.
pub struct EvaluationDisplay<'a> {
    evaluation: Option<&'a BoardEvaluation>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> EvaluationDisplay<'a> {
    pub fn new(evaluation: Option<&'a BoardEvaluation>) -> Self {
        Self {
            evaluation,
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
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        5 + super::block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> [(&'static str, String); 5] {
        let Some(evaluation) = self.evaluation else {
            return [
                ("SCORE:", "-".into()),
                ("HEIGHT:", "-".into()),
                ("LINES:", "-".into()),
                ("HOLES:", "-".into()),
                ("BUMPS:", "-".into()),
            ];
        };
        let metrics = &evaluation.metrics;
        [
            ("SCORE:", format!("{:.3}", evaluation.score)),
            ("HEIGHT:", metrics.height_sum.to_string()),
            ("LINES:", metrics.completed_lines.to_string()),
            ("HOLES:", metrics.holes.to_string()),
            ("BUMPS:", metrics.bumpiness.to_string()),
        ]
    }
}

impl Widget for EvaluationDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let lines = self.lines();
        let rows_areas = Layout::vertical(lines.iter().map(|_| Constraint::Length(1))).split(area);

        for ((label, value), area) in iter::zip(lines, rows_areas.iter().copied()) {
            let [label_area, value_area] = area.layout(&Layout::horizontal([
                Constraint::Length(7),
                Constraint::Fill(1),
            ]));
            Line::styled(label, style)
                .left_aligned()
                .render(label_area, buf);
            Line::styled(value, style)
                .right_aligned()
                .render(value_area, buf);
        }
    }
}
