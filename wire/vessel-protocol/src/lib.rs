pub mod rpc {
    tonic::include_proto!("vessel");
}

pub use rpc::daemon_client::DaemonClient;

/// Fields shared by every streamed lifecycle reply.
///
/// A reply carries either a daemon log line meant for stderr, a progress
/// message meant for the spinner, or both. Empty strings mean "nothing to
/// report".
pub trait ProgressReply {
    fn log_line(&self) -> &str;
    fn reply_message(&self) -> &str;

    /// Folds a later reply from the same stream into this one.
    ///
    /// Repeated fields accumulate in stream order. Messages keep the newest
    /// non-empty value.
    fn merge(&mut self, next: Self)
    where
        Self: Sized;
}

macro_rules! progress_reply {
    ($($reply:ty $(=> [$($repeated:ident),+])?),+ $(,)?) => {
        $(
            impl ProgressReply for $reply {
                fn log_line(&self) -> &str {
                    &self.log_line
                }

                fn reply_message(&self) -> &str {
                    &self.reply_message
                }

                fn merge(&mut self, next: Self) {
                    $($(self.$repeated.extend(next.$repeated);)+)?

                    if !next.log_line.is_empty() {
                        self.log_line = next.log_line;
                    }
                    if !next.reply_message.is_empty() {
                        self.reply_message = next.reply_message;
                    }
                }
            }
        )+
    };
}

progress_reply!(
    rpc::StartReply,
    rpc::StopReply,
    rpc::SuspendReply,
    rpc::RestartReply,
    rpc::DeleteReply => [purged_instances],
    rpc::RecoverReply,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_reply_exposes_streamed_fields() {
        let reply = rpc::SuspendReply {
            log_line: "suspending foo\n".to_string(),
            reply_message: "Waiting for foo".to_string(),
        };

        assert_eq!(reply.log_line(), "suspending foo\n");
        assert_eq!(reply.reply_message(), "Waiting for foo");
    }

    #[test]
    fn default_reply_reports_nothing() {
        let reply = rpc::DeleteReply::default();

        assert!(reply.log_line().is_empty());
        assert!(reply.reply_message().is_empty());
        assert!(reply.purged_instances.is_empty());
    }

    #[test]
    fn merge_accumulates_repeated_fields_in_order() {
        let mut merged = rpc::DeleteReply {
            purged_instances: vec!["foo".to_string()],
            reply_message: "Deleting foo".to_string(),
            ..Default::default()
        };

        merged.merge(rpc::DeleteReply {
            purged_instances: vec!["bar".to_string(), "baz".to_string()],
            reply_message: "Deleting bar".to_string(),
            ..Default::default()
        });

        assert_eq!(merged.purged_instances, vec!["foo", "bar", "baz"]);
        assert_eq!(merged.reply_message(), "Deleting bar");
    }

    #[test]
    fn merge_keeps_last_non_empty_message() {
        let mut merged = rpc::SuspendReply {
            log_line: "saving state".to_string(),
            reply_message: "Suspended foo".to_string(),
        };

        merged.merge(rpc::SuspendReply::default());

        assert_eq!(merged.log_line(), "saving state");
        assert_eq!(merged.reply_message(), "Suspended foo");
    }
}
