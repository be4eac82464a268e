use std::{ffi::OsString, io::Write};

use clap::{error::ErrorKind, CommandFactory, FromArgMatches};
use vessel_core::SettingsProvider;

use crate::{
    commands::{instance_subcommands, VesselCtlCmd},
    return_code::ReturnCode,
};

/// Result of turning a command line into something runnable.
#[derive(Debug)]
pub enum ParseOutcome<T> {
    Ok(T),
    /// Rendered diagnostic for stderr.
    ParseError(String),
    /// Rendered help or version text for stdout.
    HelpRequested(String),
}

impl<T> ParseOutcome<T> {
    pub fn return_code(&self) -> ReturnCode {
        match self {
            ParseOutcome::Ok(_) | ParseOutcome::HelpRequested(_) => ReturnCode::Ok,
            ParseOutcome::ParseError(_) => ReturnCode::CommandLineError,
        }
    }

    pub fn report(&self, out: &mut dyn Write, err: &mut dyn Write) {
        let _ = match self {
            ParseOutcome::Ok(_) => Ok(()),
            ParseOutcome::ParseError(text) => write_text(err, text),
            ParseOutcome::HelpRequested(text) => write_text(out, text),
        };
    }
}

fn write_text(w: &mut dyn Write, text: &str) -> std::io::Result<()> {
    if text.ends_with('\n') {
        write!(w, "{text}")
    } else {
        writeln!(w, "{text}")
    }
}

/// The full command tree, with instance-name help that mentions the configured
/// primary instance.
pub fn command(settings: &dyn SettingsProvider) -> clap::Command {
    let primary = settings.primary_name();

    instance_subcommands()
        .into_iter()
        .fold(VesselCtlCmd::command(), |command, (name, uses_primary)| {
            let help = names_help(name, uses_primary, primary);
            command.mut_subcommand(name, |sub| sub.mut_arg("names", |arg| arg.help(help)))
        })
}

fn names_help(action: &str, uses_primary: bool, primary: Option<&str>) -> String {
    match (uses_primary, primary) {
        (true, Some(primary)) => format!(
            "Names of instances to {action}. If omitted, and without the --all option, '{primary}' will be assumed."
        ),
        (true, None) => format!(
            "Names of instances to {action}. The primary instance is disabled, so a name or --all is required."
        ),
        (false, _) => format!("Names of instances to {action}."),
    }
}

/// Parses `args` (program name first). Reads settings for help text but never
/// prints or touches the daemon.
pub fn parse_args<I, A>(args: I, settings: &dyn SettingsProvider) -> ParseOutcome<VesselCtlCmd>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let parsed = command(settings)
        .try_get_matches_from(args)
        .and_then(|matches| VesselCtlCmd::from_arg_matches(&matches));

    match parsed {
        Ok(cmd) => ParseOutcome::Ok(cmd),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                ParseOutcome::HelpRequested(err.render().to_string())
            }
            _ => ParseOutcome::ParseError(err.render().to_string()),
        },
    }
}
