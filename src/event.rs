use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, KeyEvent};

pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Single-threaded input pump. Waits for terminal input at most until the
/// next tick deadline, then reports a tick.
pub struct EventHandler {
    tick_rate: Duration,
    next_tick: Instant,
}

/// Ticks owed beyond this are dropped instead of replayed.
const MAX_TICK_BACKLOG: u32 = 5;

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            tick_rate,
            next_tick: Instant::now() + tick_rate,
        }
    }

    pub fn next(&mut self) -> io::Result<Event> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                self.next_tick += self.tick_rate;
                if now > self.next_tick + self.tick_rate * MAX_TICK_BACKLOG {
                    self.next_tick = now + self.tick_rate;
                }
                return Ok(Event::Tick);
            }

            if event::poll(self.next_tick - now)? {
                // Resize and mouse events are redrawn on the next frame anyway.
                if let event::Event::Key(key) = event::read()? {
                    return Ok(Event::Key(key));
                }
            }
        }
    }
}
