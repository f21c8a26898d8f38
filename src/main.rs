use std::io;

use clap::Parser;

use term_sessions::config::{Cli, HostConfig};
use term_sessions::drivers::{ConsoleInputDriver, ConsoleOutputDriver, OutputDriver};
use term_sessions::host::SessionHost;
use term_sessions::pty::PtyConnector;
use term_sessions::runner::{run_host, windows_area};
use term_sessions::tracing_sub;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = HostConfig::try_from(&cli)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    tracing_sub::init(&config.log)?;
    tracing::info!(
        instances = config.instances.len(),
        command = config.command.program(),
        "starting term-sessions"
    );

    let mut output = ConsoleOutputDriver::new()?;
    let mut input = ConsoleInputDriver::new();
    let area = windows_area(output.area()?);
    let mut host = SessionHost::with_defaults(
        PtyConnector::new(config.command.clone()).with_scrollback(config.scrollback),
        area,
        config.windows.clone(),
    );
    for instance in &config.instances {
        let id = host.open_terminal(instance.clone(), instance.to_string());
        tracing::info!(session = %id, "opened startup session");
    }

    let result = run_host(&mut host, &mut input, &mut output, config.poll_interval);
    if let Err(err) = &result {
        tracing::error!(error = %err, "term-sessions exited with an error");
    }
    result
}
