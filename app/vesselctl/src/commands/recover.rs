use std::fmt::{Display, Formatter};

use clap::Args;
use vessel_protocol::rpc::RecoverRequest;

use crate::{
    commands::instance::{InstanceCommand, InstanceTargets},
    transport::Recover,
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
    type Method = Recover;

    const VERB: &'static str = "Recovering";
    const USES_PRIMARY: bool = false;

    fn targets(&self) -> &InstanceTargets {
        &self.targets
    }

    fn request(&self, instance_names: Vec<String>, verbosity_level: i32) -> RecoverRequest {
        RecoverRequest {
            instance_names,
            verbosity_level,
        }
    }
}
