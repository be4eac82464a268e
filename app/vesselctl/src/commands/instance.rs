use std::{
    fmt::{Display, Formatter},
    future::Future,
    io::Write,
};

use clap::Args;
use tonic::Status;
use tracing::debug;
use vessel_core::SettingsProvider;

use crate::{
    cli::ParseOutcome,
    dispatch::{dispatch, standard_failure_handler, Method, Outcome, Transport},
    resolve::{resolve_instance_names, Fallback},
    return_code::ReturnCode,
    spinner::Progress,
};

// Positional names plus `--all`, shared by every instance-targeting command.
#[derive(Args, Debug, Clone, Default)]
pub struct InstanceTargets {
    /// Names of instances to target
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Target all instances
    #[arg(long)]
    pub all: bool,
}

impl Display for InstanceTargets {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.all {
            write!(f, "--all")
        } else {
            write!(f, "{}", self.names.join(" "))
        }
    }
}

/// Everything one command run needs from the outside world.
pub struct Session<'a, T> {
    pub transport: &'a mut T,
    pub settings: &'a dyn SettingsProvider,
    pub progress: &'a mut dyn Progress,
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub verbosity: u8,
}

pub type RequestOf<C> = <<C as InstanceCommand>::Method as Method>::Request;
pub type ReplyOf<C> = <<C as InstanceCommand>::Method as Method>::Reply;

/// A command that sends one request naming a set of instances.
pub trait InstanceCommand {
    type Method: Method;

    const NAME: &'static str = <Self::Method as Method>::NAME;

    /// Leads the progress line, as in "Suspending foo".
    const VERB: &'static str;

    /// Whether a missing name means the primary instance.
    const USES_PRIMARY: bool;

    fn targets(&self) -> &InstanceTargets;

    fn allow_empty(&self) -> bool {
        false
    }

    fn request(
        &self,
        instance_names: Vec<String>,
        verbosity_level: i32,
    ) -> <Self::Method as Method>::Request;

    fn on_success(
        &self,
        _reply: <Self::Method as Method>::Reply,
        _out: &mut dyn Write,
    ) -> ReturnCode {
        ReturnCode::Ok
    }
}

/// Resolves the targets of `cmd` into a request and its progress message.
pub fn parse_request<C: InstanceCommand>(
    cmd: &C,
    settings: &dyn SettingsProvider,
    verbosity: u8,
) -> ParseOutcome<(String, RequestOf<C>)> {
    let fallback = if C::USES_PRIMARY {
        Fallback::Primary(settings.primary_name())
    } else {
        Fallback::Nothing
    };

    let targets = cmd.targets();
    match resolve_instance_names(&targets.names, targets.all, fallback, cmd.allow_empty()) {
        Ok(selection) => {
            let message = selection.action_message(C::VERB);
            let request = cmd.request(selection.into_wire(), i32::from(verbosity));
            ParseOutcome::Ok((message, request))
        }
        Err(err) => ParseOutcome::ParseError(format!("error: {err}")),
    }
}

/// Runs `cmd` against the daemon.
///
/// Usage errors return before the progress indicator starts or the transport
/// is touched. Once dispatched, the indicator is stopped exactly once and one
/// of the success or failure handlers decides the return code. `interrupt`
/// completing first cancels the in-flight call.
pub async fn run<C, T, I>(cmd: &C, session: &mut Session<'_, T>, interrupt: I) -> ReturnCode
where
    C: InstanceCommand,
    T: Transport,
    I: Future<Output = ()>,
{
    let (message, request) = match parse_request(cmd, session.settings, session.verbosity) {
        ParseOutcome::Ok(parsed) => parsed,
        outcome => {
            outcome.report(session.out, session.err);
            return outcome.return_code();
        }
    };

    session.progress.start(&message);

    let outcome = tokio::select! {
        outcome = dispatch::<C::Method, T>(
            session.transport,
            &request,
            session.progress,
            session.err,
        ) => outcome,
        () = interrupt => {
            debug!(command = C::NAME, "interrupted, cancelling call");
            Outcome::Failure(Status::cancelled("interrupted"))
        }
    };

    finish(cmd, &request, outcome, session.progress, session.out, session.err)
}

fn finish<C: InstanceCommand>(
    cmd: &C,
    request: &RequestOf<C>,
    outcome: Outcome<ReplyOf<C>>,
    progress: &mut dyn Progress,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> ReturnCode {
    progress.stop();

    match outcome {
        Outcome::Success(reply) => cmd.on_success(reply, out),
        Outcome::Failure(status) => {
            let names = <C::Method as Method>::instance_names(request);
            standard_failure_handler(C::NAME, names, err, &status)
        }
    }
}
