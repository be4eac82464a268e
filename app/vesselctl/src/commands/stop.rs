use std::fmt::{Display, Formatter};

use clap::Args;
use vessel_protocol::rpc::StopRequest;

use crate::{
    commands::instance::{InstanceCommand, InstanceTargets},
    transport::Stop,
};

#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    pub targets: InstanceTargets,

    /// Power off immediately instead of asking the guest to shut down
    #[arg(long)]
    pub force: bool,
}

impl Display for Cmd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.targets)?;
        if self.force {
            write!(f, " --force")?;
        }
        Ok(())
    }
}

impl InstanceCommand for Cmd {
    type Method = Stop;

    const VERB: &'static str = "Stopping";
    const USES_PRIMARY: bool = true;

    fn targets(&self) -> &InstanceTargets {
        &self.targets
    }

    fn request(&self, instance_names: Vec<String>, verbosity_level: i32) -> StopRequest {
        StopRequest {
            instance_names,
            verbosity_level,
            force: self.force,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_is_forwarded() {
        let cmd = Cmd {
            targets: InstanceTargets {
                names: vec!["foo".to_string()],
                all: false,
            },
            force: true,
        };

        let request = cmd.request(vec!["foo".to_string()], 1);

        assert!(request.force);
        assert_eq!(request.verbosity_level, 1);
        assert_eq!(cmd.to_string(), "foo --force");
    }
}
