//! Per-tick input from the host environment
//!
//! Loops never read a global event queue: each tick receives the result of
//! one poll and, for human play, one keyboard snapshot.

/// Result of polling the host once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Continue,
    /// Window closed or shutdown requested
    Quit,
}

/// Something that can be polled once per tick
pub trait EventSource {
    fn poll(&mut self) -> Signal;
}

impl<F> EventSource for F
where
    F: FnMut() -> Signal,
{
    fn poll(&mut self) -> Signal {
        self()
    }
}

/// Headless runs: nothing ever asks to stop
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl EventSource for Unattended {
    fn poll(&mut self) -> Signal {
        Signal::Continue
    }
}

/// Held movement keys of the human player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
}

/// Everything one interactive tick consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub signal: Signal,
    pub keys: KeyState,
}

impl TickInput {
    pub fn keys(up: bool, down: bool) -> Self {
        Self {
            signal: Signal::Continue,
            keys: KeyState { up, down },
        }
    }

    pub fn quit() -> Self {
        Self {
            signal: Signal::Quit,
            keys: KeyState::default(),
        }
    }
}
