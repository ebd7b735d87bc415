use std::io;

use color_eyre::Result;
use skiff::{
    config::Config,
    input::{InputMessage, LineReader},
    parse_command, ShellContext,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[macro_use]
extern crate tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("skiff: {err}");
        Config::default()
    });

    let log_dir = match std::fs::create_dir_all(&config.log_dir) {
        Ok(()) => config.log_dir.clone(),
        Err(err) => {
            eprintln!("skiff: cannot create {}: {err}", config.log_dir.display());
            std::env::temp_dir()
        }
    };

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, "skiff.log"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::install()?;

    trace!(?config, "starting shell");

    tokio::spawn(absorb_interrupts());

    let mut ctx = ShellContext::from_env();

    if let Some(path) = &config.history_file {
        if path.exists() {
            if let Err(err) = ctx.history.load(path) {
                ctx.report(format!("skiff: history: {err}"));
            }
        }
    }

    let mut reader = LineReader::new(config.prompt.clone());

    let outcome = repl(&mut ctx, &mut reader).await;

    if let Some(path) = &config.history_file {
        if let Err(err) = ctx.history.append_to(path) {
            ctx.report(format!("skiff: history: {err}"));
        }
    }

    let code = outcome?;

    debug!(code, "exiting");

    // flush the log before the process goes away
    drop(guard);

    std::process::exit(code);
}

/// Reads and runs lines until `exit` or end of input. Returns the exit code.
async fn repl(ctx: &mut ShellContext, reader: &mut LineReader) -> Result<i32> {
    loop {
        let line = match reader.read_line(&mut ctx.history, &ctx.resolver).await {
            Ok(InputMessage::Line(line)) => line,
            Ok(InputMessage::Eof) => return Ok(0),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                ctx.report(format!("skiff: input: {err}"));
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        ctx.history.add(line);

        let plan = match parse_command(line) {
            Ok(plan) => plan,
            Err(err) => {
                ctx.report(format!("skiff: {err}"));
                continue;
            }
        };

        trace!(?plan, "execution plan");

        let result = plan.execute(ctx).await;

        debug!(?result, "pipeline finished");

        if let Some(code) = ctx.exit_requested() {
            return Ok(code);
        }
    }
}

/// Keeps Ctrl-C from killing the shell; the foreground children still get it.
async fn absorb_interrupts() {
    while tokio::signal::ctrl_c().await.is_ok() {
        debug!("interrupt received");
    }
}
