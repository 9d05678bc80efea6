use std::{
    thread,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::Rng;

use crate::{
    env::{DiscreteActionSpace, Environment, Transition},
    error::{Error, Result},
};

use self::components::CartPoleView;

mod components;
mod tui;

/// Time between frames, 50 fps
const FRAME: Duration = Duration::from_millis(20);

/// Wraps a CartPole-like environment and draws every step in the terminal
///
/// The terminal is taken over on construction and restored when the wrapper is dropped.
/// Pressing `q` makes the next step fail with [`Error::Interrupted`].
pub struct Rendered<E> {
    env: E,
    terminal: tui::Tui,
    view: CartPoleView,
    last_frame: Instant,
}

impl<E> Rendered<E> {
    pub fn new(env: E) -> Result<Self> {
        Ok(Self {
            env,
            terminal: tui::init()?,
            view: CartPoleView::default(),
            last_frame: Instant::now(),
        })
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    fn draw(&mut self) -> Result<()> {
        let view = &self.view;
        self.terminal
            .draw(|frame| frame.render_widget(view, frame.size()))?;

        if let Some(wait) = FRAME.checked_sub(self.last_frame.elapsed()) {
            thread::sleep(wait);
        }
        self.last_frame = Instant::now();

        if quit_requested()? {
            return Err(Error::Interrupted);
        }
        Ok(())
    }
}

/// Drains pending terminal events, reporting whether `q` was pressed
fn quit_requested() -> Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

impl<E> Drop for Rendered<E> {
    fn drop(&mut self) {
        let _ = tui::restore();
    }
}

impl<E> Environment for Rendered<E>
where
    E: Environment<Observation = [f32; 4]>,
{
    type Observation = [f32; 4];
    type Action = E::Action;

    fn reset(&mut self) -> Result<Self::Observation> {
        let observation = self.env.reset()?;
        self.view.reset(observation);
        self.draw()?;
        Ok(observation)
    }

    fn step(&mut self, action: Self::Action) -> Result<Transition<Self::Observation>> {
        let transition = self.env.step(action)?;
        self.view.update(transition.observation, transition.reward);
        self.draw()?;
        Ok(transition)
    }

    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Action {
        self.env.random_action(rng)
    }
}

impl<E> DiscreteActionSpace for Rendered<E>
where
    E: DiscreteActionSpace<Observation = [f32; 4]>,
{
    fn actions(&self) -> Vec<Self::Action> {
        self.env.actions()
    }
}
