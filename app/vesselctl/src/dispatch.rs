use std::io::Write;

use futures::{
    future::LocalBoxFuture,
    stream::{LocalBoxStream, StreamExt},
};
use tonic::{transport::Channel, Code, Status};
use tracing::{debug, trace};
use vessel_protocol::{DaemonClient, ProgressReply};

use crate::{return_code::ReturnCode, spinner::Progress};

pub type ReplyStream<R> = LocalBoxStream<'static, Result<R, Status>>;

/// Terminal result of one remote invocation.
#[derive(Debug)]
pub enum Outcome<R> {
    Success(R),
    Failure(Status),
}

/// A remote operation on the daemon, identified by type.
pub trait Method: 'static {
    type Request: Clone + 'static;
    type Reply: ProgressReply + Default + 'static;

    const NAME: &'static str;

    fn instance_names(request: &Self::Request) -> &[String];

    fn call(
        client: &mut DaemonClient<Channel>,
        request: Self::Request,
    ) -> LocalBoxFuture<'_, Result<ReplyStream<Self::Reply>, Status>>;
}

pub trait Transport {
    fn invoke<M: Method>(
        &mut self,
        request: M::Request,
    ) -> LocalBoxFuture<'_, Result<ReplyStream<M::Reply>, Status>>;
}

/// Invokes `M` with `request` and drains the reply stream into one outcome.
///
/// Daemon log lines go to `log`, progress messages to `progress`. The
/// indicator is left running; stopping it is up to the caller.
pub async fn dispatch<M, T>(
    transport: &mut T,
    request: &M::Request,
    progress: &mut dyn Progress,
    log: &mut dyn Write,
) -> Outcome<M::Reply>
where
    M: Method,
    T: Transport,
{
    debug!(
        method = M::NAME,
        instances = ?M::instance_names(request),
        "dispatching request"
    );

    let replies = match transport.invoke::<M>(request.clone()).await {
        Ok(replies) => replies,
        Err(status) => {
            debug!(method = M::NAME, code = ?status.code(), "call rejected");
            return Outcome::Failure(status);
        }
    };

    drain(replies, progress, log).await
}

/// Forwards each reply's log line and progress message as it arrives, and
/// merges every reply into the one handed to the success path.
pub async fn drain<R>(
    mut replies: ReplyStream<R>,
    progress: &mut dyn Progress,
    log: &mut dyn Write,
) -> Outcome<R>
where
    R: ProgressReply + Default + 'static,
{
    let mut merged = R::default();

    while let Some(item) = replies.next().await {
        let reply = match item {
            Ok(reply) => reply,
            Err(status) => {
                debug!(code = ?status.code(), "reply stream failed");
                return Outcome::Failure(status);
            }
        };

        let line = reply.log_line();
        if !line.is_empty() {
            let _ = if line.ends_with('\n') {
                write!(log, "{line}")
            } else {
                writeln!(log, "{line}")
            };
        }

        if !reply.reply_message().is_empty() {
            trace!(message = reply.reply_message(), "progress update");
            progress.update(reply.reply_message());
        }

        merged.merge(reply);
    }

    Outcome::Success(merged)
}

/// Reports a failed call as `<command>: <message>`.
///
/// A status without a message falls back to the code's description, followed
/// by the instances the request named.
pub fn standard_failure_handler(
    command: &str,
    instance_names: &[String],
    err: &mut dyn Write,
    status: &Status,
) -> ReturnCode {
    let detail = match (status.message(), instance_names) {
        ("", []) => status.code().description().to_string(),
        ("", names) => format!("{}: {}", status.code().description(), names.join(", ")),
        (message, _) => message.to_string(),
    };

    let _ = match status.code() {
        Code::Unavailable => writeln!(err, "{command}: cannot connect to the daemon: {detail}"),
        Code::Cancelled => writeln!(err, "{command}: cancelled: {detail}"),
        _ => writeln!(err, "{command}: {detail}"),
    };

    ReturnCode::CommandFail
}
