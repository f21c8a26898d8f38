use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

/// Upper bound on events handled between two idle ticks, so a long mouse
/// drag still lets the host pump status and redraw.
const MAX_BURST: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Message pump for the UI thread.
///
/// The loop is the only caller of `poll`/`read` on the input driver. The
/// handler is called with `None` once per turn (the idle tick, where status
/// is pumped and the screen drawn) and with `Some(event)` for every input
/// event. Input arriving in a burst is drained before the next tick.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                return Ok(());
            }
            if !self.driver.poll(self.poll_interval)? {
                continue;
            }
            for _ in 0..MAX_BURST {
                let event = self.driver.read()?;
                if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                    return Ok(());
                }
                if !self.driver.poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::QueuedInputDriver;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn burst_is_drained_before_next_tick() {
        let input = QueuedInputDriver::new([key('a'), key('b'), key('q')]);
        let mut event_loop = EventLoop::new(input, Duration::ZERO);
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                match event {
                    None => seen.push("tick".to_string()),
                    Some(Event::Key(k)) if k.code == KeyCode::Char('q') => {
                        return Ok(ControlFlow::Quit);
                    }
                    Some(Event::Key(k)) => seen.push(format!("{:?}", k.code)),
                    Some(_) => {}
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(seen, ["tick", "Char('a')", "Char('b')"]);
    }

    #[test]
    fn quit_on_idle_tick() {
        let mut event_loop = EventLoop::new(QueuedInputDriver::default(), Duration::ZERO);
        let mut ticks = 0;
        event_loop
            .run(|_, _| {
                ticks += 1;
                Ok(if ticks == 3 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(ticks, 3);
        assert_eq!(event_loop.into_driver().remaining(), 0);
    }
}
