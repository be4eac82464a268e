use std::fmt::{Display, Formatter};
use std::io::Write;

use clap::Args;
use vessel_protocol::rpc::{DeleteReply, DeleteRequest};

use crate::{
    commands::instance::{InstanceCommand, InstanceTargets},
    return_code::ReturnCode,
    transport::Delete,
};

#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    pub targets: InstanceTargets,

    /// Permanently remove the instances instead of keeping them recoverable
    #[arg(short, long)]
    pub purge: bool,
}

impl Display for Cmd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.targets)?;
        if self.purge {
            write!(f, " --purge")?;
        }
        Ok(())
    }
}

impl InstanceCommand for Cmd {
    type Method = Delete;

    const VERB: &'static str = "Deleting";
    const USES_PRIMARY: bool = false;

    fn targets(&self) -> &InstanceTargets {
        &self.targets
    }

    fn request(&self, instance_names: Vec<String>, verbosity_level: i32) -> DeleteRequest {
        DeleteRequest {
            instance_names,
            verbosity_level,
            purge: self.purge,
        }
    }

    fn on_success(&self, reply: DeleteReply, out: &mut dyn Write) -> ReturnCode {
        for name in &reply.purged_instances {
            let _ = writeln!(out, "purged {}", name);
        }

        ReturnCode::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::instance::tests::run_with, dispatch::tests::Script};

    fn delete_cmd(names: &[&str], all: bool, purge: bool) -> Cmd {
        Cmd {
            targets: InstanceTargets {
                names: names.iter().map(|name| name.to_string()).collect(),
                all,
            },
            purge,
        }
    }

    #[tokio::test]
    async fn delete_never_assumes_the_primary_instance() {
        let run = run_with(
            &delete_cmd(&[], false, false),
            Some("primary"),
            vec![],
            std::future::pending(),
        )
        .await;

        assert_eq!(run.code, ReturnCode::CommandLineError);
        assert!(run.transport.calls.is_empty());
        assert_eq!(run.err, "error: name argument or --all is required\n");
    }

    #[tokio::test]
    async fn delete_all_sends_empty_name_list() {
        let run = run_with(
            &delete_cmd(&[], true, true),
            None,
            vec![Script::Replies(2)],
            std::future::pending(),
        )
        .await;

        assert_eq!(run.code, ReturnCode::Ok);
        assert_eq!(run.transport.calls, vec![("delete", Vec::new())]);
        assert_eq!(run.progress.started, vec!["Deleting all instances"]);
        assert_eq!(run.progress.stops, 1);
    }

    #[tokio::test]
    async fn every_streamed_purge_is_reported() {
        let replies = ["foo", "bar", "baz"].map(|name| DeleteReply {
            purged_instances: vec![name.to_string()],
            reply_message: format!("Purged {name}"),
            ..Default::default()
        });

        let run = run_with(
            &delete_cmd(&[], true, true),
            None,
            vec![Script::stream(replies)],
            std::future::pending(),
        )
        .await;

        assert_eq!(run.code, ReturnCode::Ok);
        assert_eq!(run.out, "purged foo\npurged bar\npurged baz\n");
        assert_eq!(
            run.progress.updates,
            vec!["Purged foo", "Purged bar", "Purged baz"]
        );
        assert_eq!(run.progress.stops, 1);
        assert!(run.err.is_empty());
    }

    #[test]
    fn purged_instances_are_listed() {
        let cmd = delete_cmd(&["foo", "bar"], false, true);
        let reply = DeleteReply {
            purged_instances: vec!["foo".to_string(), "bar".to_string()],
            ..Default::default()
        };
        let mut out = Vec::new();

        assert_eq!(cmd.on_success(reply, &mut out), ReturnCode::Ok);
        assert_eq!(String::from_utf8(out).unwrap(), "purged foo\npurged bar\n");
        assert_eq!(cmd.to_string(), "foo bar --purge");
    }
}
