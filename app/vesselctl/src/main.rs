mod cli;
mod commands;
mod dispatch;
mod resolve;
mod return_code;
mod spinner;
mod transport;

use std::process::ExitCode;

use eyre::{Context, Report};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use vessel_core::Settings;

use crate::cli::ParseOutcome;
use crate::commands::{instance::Session, VesselCtlCmd};
use crate::return_code::ReturnCode;
use crate::spinner::AnimatedSpinner;
use crate::transport::DaemonTransport;

fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            print_error(&Report::new(err), 0);
            return ReturnCode::CommandFail.into();
        }
    };

    let cmd = match cli::parse_args(std::env::args_os(), &settings) {
        ParseOutcome::Ok(cmd) => cmd,
        outcome => {
            outcome.report(&mut std::io::stdout(), &mut std::io::stderr());
            return outcome.return_code().into();
        }
    };

    init_tracing(cmd.verbose);

    match run(&cmd, &settings) {
        Ok(code) => code.into(),
        Err(err) => {
            print_error(&err, cmd.verbose);
            ReturnCode::CommandFail.into()
        }
    }
}

fn run(cmd: &VesselCtlCmd, settings: &Settings) -> eyre::Result<ReturnCode> {
    debug!(command = %cmd.cmd, "running command");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    runtime.block_on(async {
        let mut transport = DaemonTransport::connect_lazy(&settings.daemon_socket())?;
        let mut progress = AnimatedSpinner::new();
        let mut out = std::io::stdout();
        let mut err = std::io::stderr();

        let mut session = Session {
            transport: &mut transport,
            settings,
            progress: &mut progress,
            out: &mut out,
            err: &mut err,
            verbosity: cmd.verbose,
        };

        Ok::<_, Report>(cmd.cmd.run(&mut session, interrupted()).await)
    })
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,vesselctl={level},vessel_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_error(err: &Report, verbose: u8) {
    eprintln!("\x1b[31merror:\x1b[0m {}", err);

    if verbose == 0 {
        if err.chain().nth(1).is_some() {
            eprintln!("hint: run with -v to see the full error chain");
        }
        return;
    }

    let mut last = err.to_string();
    let mut idx = 0usize;
    for cause in err.chain().skip(1) {
        let msg = cause.to_string();
        if msg == last {
            continue;
        }
        idx += 1;
        eprintln!("  {}. {}", idx, msg);
        last = msg;
    }
}
