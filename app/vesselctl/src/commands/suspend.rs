use std::fmt::{Display, Formatter};

use clap::Args;
use vessel_protocol::rpc::SuspendRequest;

use crate::{
    commands::instance::{InstanceCommand, InstanceTargets},
    transport::Suspend,
};

#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    pub targets: InstanceTargets,
}

impl Display for Cmd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.targets)
    }
}

impl InstanceCommand for Cmd {
    type Method = Suspend;

    const VERB: &'static str = "Suspending";
    const USES_PRIMARY: bool = true;

    fn targets(&self) -> &InstanceTargets {
        &self.targets
    }

    fn request(&self, instance_names: Vec<String>, verbosity_level: i32) -> SuspendRequest {
        SuspendRequest {
            instance_names,
            verbosity_level,
        }
    }
}
