use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use term_sessions::connector::ScriptedConnector;
use term_sessions::drivers::{OutputDriver, TestOutputDriver};
use term_sessions::host::{SessionHost, WindowDefaults};
use term_sessions::layout::{ResizeEdge, Size, Viewport};
use term_sessions::runner::windows_area;
use term_sessions::session::ConnectionStatus;

const INSTANCES: [&str; 6] = ["i-0a1", "i-0b2", "i-0c3", "i-0d4", "i-0e5", "i-0f6"];

#[derive(Parser, Debug)]
#[command(
    name = "session-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Headless stress run: random open/close/drag/resize and out-of-order status"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 3.0
    )]
    duration_seconds: f64,

    /// Upper bound on concurrently open sessions.
    #[arg(short = 'w', long = "windows", default_value_t = 12)]
    max_windows: usize,

    /// Screen width in cells.
    #[arg(long = "width", default_value_t = 160)]
    width: u16,

    /// Screen height in cells.
    #[arg(long = "height", default_value_t = 48)]
    height: u16,

    /// Seed for the action generator. Defaults to the clock.
    #[arg(long = "seed")]
    seed: Option<u64>,
}

struct BenchConfig {
    duration: Duration,
    max_windows: usize,
    screen: Rect,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.1..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.1 and 600 seconds".to_string());
        }
        if !(1..=256).contains(&cli.max_windows) {
            return Err("windows must be between 1 and 256".to_string());
        }
        if cli.width < 20 || cli.height < 8 {
            return Err("screen must be at least 20x8 cells".to_string());
        }
        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            max_windows: cli.max_windows,
            screen: Rect::new(0, 0, cli.width, cli.height),
            seed,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    if stats.violations > 0 {
        return Err(io::Error::other(format!(
            "{} geometry violations",
            stats.violations
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Open,
    Close,
    Drag,
    Resize,
    Status,
    Viewport,
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let mut rng = XorShift::new(config.seed);
    let mut output = TestOutputDriver::new(config.screen.width, config.screen.height)?;
    let defaults = WindowDefaults {
        initial_size: Size::new(60, 18),
        min_size: Size::new(20, 6),
        resize_edges: ResizeEdge::ALL.to_vec(),
        ..WindowDefaults::default()
    };
    let mut host = SessionHost::with_defaults(
        ScriptedConnector::new(),
        windows_area(config.screen),
        defaults.clone(),
    );
    let mut stats = BenchStats::new();

    while stats.start.elapsed() < config.duration {
        let action = match rng.below(10) {
            0 | 1 => Action::Open,
            2 => Action::Close,
            3 | 4 => Action::Drag,
            5 => Action::Resize,
            6 | 7 | 8 => Action::Status,
            _ => Action::Viewport,
        };
        match action {
            Action::Open if host.snapshot().len() < config.max_windows => {
                let instance = INSTANCES[rng.below(INSTANCES.len() as u64) as usize];
                host.open_terminal(instance, instance);
                stats.opened += 1;
            }
            Action::Open | Action::Close => {
                let ids = host.snapshot().ids();
                if !ids.is_empty() {
                    let id = &ids[rng.below(ids.len() as u64) as usize];
                    host.close(id);
                    stats.closed += 1;
                }
            }
            Action::Drag | Action::Resize => {
                let ids = host.snapshot().ids();
                if ids.is_empty() {
                    continue;
                }
                let id = &ids[rng.below(ids.len() as u64) as usize];
                let Some(frame) = host.frame(id) else {
                    continue;
                };
                let outer = frame.outer_rect(host.area());
                let from = match action {
                    Action::Drag => (outer.x.saturating_add(1), outer.y),
                    _ => (
                        outer.x.saturating_add(outer.width).saturating_sub(1),
                        outer.y.saturating_add(outer.height).saturating_sub(1),
                    ),
                };
                let to = (
                    rng.below(config.screen.width as u64 + 20) as u16,
                    rng.below(config.screen.height as u64 + 10) as u16,
                );
                drag(&mut host, from, to);
                stats.drags += 1;
            }
            Action::Status => {
                let senders = host.connector().senders().to_vec();
                if senders.is_empty() {
                    continue;
                }
                for _ in 0..rng.below(8) + 1 {
                    let sender = &senders[rng.below(senders.len() as u64) as usize];
                    let status = match rng.below(4) {
                        0 => ConnectionStatus::Disconnected,
                        1 => ConnectionStatus::Connecting,
                        2 => ConnectionStatus::Connected,
                        _ => ConnectionStatus::error("connection reset"),
                    };
                    sender.send(status);
                    stats.status_sent += 1;
                }
            }
            Action::Viewport => {
                let width = 20 + rng.below(config.screen.width as u64 - 19) as u16;
                let height = 8 + rng.below(config.screen.height as u64 - 7) as u16;
                output.resize(width, height);
                stats.viewport_changes += 1;
            }
        }

        stats.status_applied += host.pump_status() as u64;
        let screen = output.area()?;
        let frame_start = Instant::now();
        output.draw(|mut frame| host.render(&mut frame, windows_area(screen)))?;
        stats.record_frame(frame_start.elapsed());
        stats.violations += count_violations(&host, &defaults);
    }

    host.close_all();
    stats.finished = Some(Instant::now());
    Ok(stats)
}

fn drag(host: &mut SessionHost<ScriptedConnector>, from: (u16, u16), to: (u16, u16)) {
    let mouse = |kind, (column, row): (u16, u16)| {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    };
    let mid = (from.0.midpoint(to.0), from.1.midpoint(to.1));
    host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), from));
    host.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), mid));
    host.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), to));
    host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), to));
}

/// Windows that break the placement rules for the current viewport.
fn count_violations(host: &SessionHost<ScriptedConnector>, defaults: &WindowDefaults) -> u64 {
    let viewport: Viewport = host.viewport();
    host.snapshot()
        .ids()
        .iter()
        .filter_map(|id| host.geometry(id))
        .filter(|g| {
            let size_ok = g.size.width >= defaults.min_size.width
                && g.size.height >= defaults.min_size.height;
            let x_ok = (g.size.width > viewport.width && g.position.x == 0)
                || g.position.x as u32 + g.size.width as u32 <= viewport.width as u32;
            let y_ok = (g.size.height > viewport.height && g.position.y == 0)
                || g.position.y as u32 + g.size.height as u32 <= viewport.height as u32;
            !(size_ok && x_ok && y_ok)
        })
        .count() as u64
}

struct BenchStats {
    start: Instant,
    finished: Option<Instant>,
    frames: u64,
    total_draw_time: Duration,
    slowest_frame: Duration,
    opened: u64,
    closed: u64,
    drags: u64,
    status_sent: u64,
    status_applied: u64,
    viewport_changes: u64,
    violations: u64,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            finished: None,
            frames: 0,
            total_draw_time: Duration::ZERO,
            slowest_frame: Duration::ZERO,
            opened: 0,
            closed: 0,
            drags: 0,
            status_sent: 0,
            status_applied: 0,
            viewport_changes: 0,
            violations: 0,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.finished {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn record_frame(&mut self, draw_time: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.total_draw_time += draw_time;
        self.slowest_frame = self.slowest_frame.max(draw_time);
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        (self.total_draw_time.as_secs_f64() / self.frames as f64) * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let steps_per_sec = if elapsed > 0.0 {
            self.frames as f64 / elapsed
        } else {
            0.0
        };
        indoc::formatdoc!(
            r#"
            Session bench finished (seed {seed}).
            Duration: {elapsed:.2}s | Steps: {frames} (~{steps_per_sec:.0}/s)
            Sessions opened: {opened} | closed: {closed} | drags/resizes: {drags}
            Status sent: {sent} | applied: {applied} | viewport changes: {viewports}
            Avg frame: {avg:.3} ms | Worst: {worst:.3} ms
            Geometry violations: {violations}
            "#,
            seed = config.seed,
            elapsed = elapsed,
            frames = self.frames,
            steps_per_sec = steps_per_sec,
            opened = self.opened,
            closed = self.closed,
            drags = self.drags,
            sent = self.status_sent,
            applied = self.status_applied,
            viewports = self.viewport_changes,
            avg = self.average_frame_ms(),
            worst = self.slowest_frame.as_secs_f64() * 1_000.0,
            violations = self.violations,
        )
    }
}

struct XorShift {
    state: u64,
}

impl XorShift {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0xA5A5_A5A5_1234_5678,
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next() % bound
    }
}
