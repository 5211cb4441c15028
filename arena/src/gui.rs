//! ggez front end: paints simulation frames and feeds window events back in
//! as per-tick input.

use ggez::conf::{WindowMode, WindowSetup};
use ggez::event::{self, EventHandler};
use ggez::graphics::{self, Canvas, DrawMode, DrawParam, Mesh, Quad, Rect, Text, TextAlign, TextLayout};
use ggez::input::keyboard::KeyCode;
use ggez::{Context, ContextBuilder, GameError, GameResult};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use brain::{DecisionFn, Network};
use game_core::{Frame, Shape};

use crate::driver::{check_generations, Driver, GenerationRun, Progress};
use crate::error::ArenaError;
use crate::events::{KeyState, Signal, TickInput};
use crate::population::{Neat, Population};
use crate::session::{PlaySession, SessionStatus};

/// Simulation rate of the interactive game
pub const TICKS_PER_SECOND: u32 = 60;

/// Time spent simulating per displayed frame while watching training
const WATCH_BUDGET: Duration = Duration::from_millis(12);

fn color(c: game_core::Color) -> graphics::Color {
    let [r, g, b, a] = c.0;
    graphics::Color::new(r, g, b, a)
}

fn to_game_error(err: ArenaError) -> GameError {
    GameError::CustomError(err.to_string())
}

/// Draw a frame's shapes in order onto a cleared canvas
pub fn paint(ctx: &mut Context, frame: &Frame) -> GameResult {
    let mut canvas = Canvas::from_frame(ctx, color(frame.background));

    for shape in &frame.shapes {
        match shape {
            Shape::Rect { x, y, w, h, color: c } => {
                canvas.draw(
                    &Quad,
                    DrawParam::new()
                        .dest_rect(Rect::new(*x, *y, *w, *h))
                        .color(color(*c)),
                );
            }
            Shape::Circle { x, y, radius, color: c } => {
                let mesh = Mesh::new_circle(ctx, DrawMode::fill(), [*x, *y], *radius, 0.5, color(*c))?;
                canvas.draw(&mesh, DrawParam::default());
            }
            Shape::Text { x, y, size, content, color: c } => {
                let mut text = Text::new(content.as_str());
                text.set_scale(*size);
                text.set_layout(TextLayout {
                    h_align: TextAlign::Middle,
                    v_align: TextAlign::Begin,
                });
                canvas.draw(&text, DrawParam::new().dest([*x, *y]).color(color(*c)));
            }
        }
    }

    canvas.finish(ctx)
}

fn context_builder(title: &str, frame: &Frame) -> ContextBuilder {
    ContextBuilder::new("neat-pong", "neat-pong")
        .window_setup(WindowSetup::default().title(title))
        .window_mode(WindowMode::default().dimensions(frame.width, frame.height))
}

/// Human (W/S) against a brain until the window is closed
pub struct PlayWindow<D> {
    session: PlaySession<D>,
    draw_hits: bool,
    quit_requested: bool,
}

impl<D: DecisionFn> PlayWindow<D> {
    pub fn new(session: PlaySession<D>, draw_hits: bool) -> Self {
        Self {
            session,
            draw_hits,
            quit_requested: false,
        }
    }
}

impl<D: DecisionFn> EventHandler<GameError> for PlayWindow<D> {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        while ctx.time.check_update_time(TICKS_PER_SECOND) {
            let input = TickInput {
                signal: if self.quit_requested {
                    Signal::Quit
                } else {
                    Signal::Continue
                },
                keys: KeyState {
                    up: ctx.keyboard.is_key_pressed(KeyCode::W),
                    down: ctx.keyboard.is_key_pressed(KeyCode::S),
                },
            };
            if self.session.step(input) == SessionStatus::Ended {
                ctx.request_quit();
                break;
            }
        }
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        paint(ctx, &self.session.frame(self.draw_hits))
    }

    fn quit_event(&mut self, _ctx: &mut Context) -> Result<bool, GameError> {
        if self.session.is_ended() {
            return Ok(false);
        }
        // Let the next tick see the quit signal
        self.quit_requested = true;
        Ok(true)
    }
}

/// Open the game window; returns only if the window cannot be created
pub fn play<D: DecisionFn + 'static>(session: PlaySession<D>, draw_hits: bool) -> GameResult {
    let (ctx, event_loop) = context_builder("NEAT Pong", &session.frame(false)).build()?;
    event::run(ctx, event_loop, PlayWindow::new(session, draw_hits))
}

/// Training shown live: the trial in progress is drawn every frame
pub struct WatchWindow {
    driver: Driver<Neat>,
    current: Option<(GenerationRun<Network>, Instant)>,
    remaining: usize,
    winner_path: PathBuf,
    finished: bool,
}

impl WatchWindow {
    pub fn new(
        driver: Driver<Neat>,
        generations: usize,
        winner_path: PathBuf,
    ) -> Result<Self, ArenaError> {
        check_generations(generations)?;
        Ok(Self {
            driver,
            current: None,
            remaining: generations,
            winner_path,
            finished: false,
        })
    }

    fn complete(&mut self, ctx: &mut Context) -> Result<(), ArenaError> {
        self.driver.end_run()?;
        let champion = self
            .driver
            .population()
            .champion()
            .ok_or(ArenaError::NoChampion)?;
        brain::save_winner(&champion.genome, &self.winner_path)?;
        log::info!("saved winner to {}", self.winner_path.display());
        self.finished = true;
        ctx.request_quit();
        Ok(())
    }

    fn simulate(&mut self, ctx: &mut Context) -> Result<(), ArenaError> {
        let deadline = Instant::now() + WATCH_BUDGET;
        while !self.finished && Instant::now() < deadline {
            if self.current.is_none() {
                if self.remaining == 0 {
                    return self.complete(ctx);
                }
                self.current = Some((self.driver.begin_generation()?, Instant::now()));
            }
            let Some((run, started)) = self.current.as_mut() else {
                continue;
            };

            if run.advance(Signal::Continue) == Progress::Complete {
                let elapsed = started.elapsed();
                if let Some((run, _)) = self.current.take() {
                    self.driver.finish_generation(run, elapsed)?;
                }
                self.remaining -= 1;
            }
        }
        Ok(())
    }
}

impl EventHandler<GameError> for WatchWindow {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        self.simulate(ctx).map_err(to_game_error)
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        match self.current.as_ref().and_then(|(run, _)| run.current_simulation()) {
            Some(sim) => paint(ctx, &sim.render(false, true)),
            None => {
                let canvas = Canvas::from_frame(ctx, graphics::Color::BLACK);
                canvas.finish(ctx)
            }
        }
    }

    fn quit_event(&mut self, _ctx: &mut Context) -> Result<bool, GameError> {
        if !self.finished {
            if let Some((run, _)) = self.current.as_mut() {
                run.advance(Signal::Quit);
            }
            log::warn!(
                "window closed during generation {}, stopping without saving",
                self.driver.population().generation()
            );
        }
        Ok(false)
    }
}

/// Train with the current trial on screen, saving the winner when done
pub fn watch(driver: Driver<Neat>, generations: usize, winner_path: PathBuf) -> GameResult {
    let window = WatchWindow::new(driver, generations, winner_path).map_err(to_game_error)?;
    let frame = game_core::Simulation::new(game_core::Config::new(), 0).render(false, false);
    let (ctx, event_loop) = context_builder("NEAT Pong training", &frame).build()?;
    event::run(ctx, event_loop, window)
}
