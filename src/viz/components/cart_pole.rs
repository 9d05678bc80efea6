use ratatui::{
    prelude::*,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Rectangle},
        *,
    },
};

use super::Logs;
use crate::gym::cart_pole::X_THRESHOLD;

const CART_WIDTH: f64 = 0.5;
const CART_HEIGHT: f64 = 0.15;
/// Full pole length in track units
const POLE_LENGTH: f64 = 1.0;

/// Snapshot of the running episode drawn by the renderer
#[derive(Debug, Default, Clone)]
pub struct CartPoleView {
    pub episode: usize,
    pub step: usize,
    pub reward: f32,
    pub observation: [f32; 4],
}

impl CartPoleView {
    /// Start drawing a new episode from its initial observation
    pub fn reset(&mut self, observation: [f32; 4]) {
        self.episode += 1;
        self.step = 0;
        self.reward = 0.0;
        self.observation = observation;
    }

    pub fn update(&mut self, observation: [f32; 4], reward: f32) {
        self.step += 1;
        self.reward += reward;
        self.observation = observation;
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let [x, _, theta, _] = self.observation;
        Paragraph::new(Line::from(vec![
            Span::from(" episode ").dark_gray(),
            Span::from(self.episode.to_string()).light_cyan().bold(),
            Span::from("  step ").dark_gray(),
            Span::from(self.step.to_string()).light_cyan().bold(),
            Span::from("  reward ").dark_gray(),
            Span::from(self.reward.to_string()).light_green().bold(),
            Span::from(format!("  x {x:+.2}  θ {theta:+.3}")).dark_gray(),
            Span::from("   q: quit").dark_gray(),
        ]))
        .render(area, buf);
    }

    fn render_scene(&self, area: Rect, buf: &mut Buffer) {
        let x = self.observation[0] as f64;
        let theta = self.observation[2] as f64;
        let bound = X_THRESHOLD * 1.2;

        Canvas::default()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("CartPole"),
            )
            .marker(symbols::Marker::Braille)
            .x_bounds([-bound, bound])
            .y_bounds([-0.25, POLE_LENGTH + 0.5])
            .paint(|ctx| {
                ctx.draw(&CanvasLine {
                    x1: -X_THRESHOLD,
                    y1: 0.0,
                    x2: X_THRESHOLD,
                    y2: 0.0,
                    color: Color::DarkGray,
                });
                ctx.draw(&Rectangle {
                    x: x - CART_WIDTH / 2.0,
                    y: 0.0,
                    width: CART_WIDTH,
                    height: CART_HEIGHT,
                    color: Color::Cyan,
                });
                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: CART_HEIGHT,
                    x2: x + POLE_LENGTH * theta.sin(),
                    y2: CART_HEIGHT + POLE_LENGTH * theta.cos(),
                    color: Color::Yellow,
                });
            })
            .render(area, buf);
    }
}

impl Widget for &CartPoleView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [status_area, scene_area, log_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(8),
        ])
        .areas(area);

        self.render_status(status_area, buf);
        self.render_scene(scene_area, buf);
        Logs.render(log_area, buf);
    }
}
