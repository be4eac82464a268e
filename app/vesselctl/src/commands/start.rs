use std::fmt::{Display, Formatter};

use clap::Args;
use vessel_protocol::rpc::StartRequest;

use crate::{
    commands::instance::{InstanceCommand, InstanceTargets},
    transport::Start,
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
    type Method = Start;

    const VERB: &'static str = "Starting";
    const USES_PRIMARY: bool = true;

    fn targets(&self) -> &InstanceTargets {
        &self.targets
    }

    fn request(&self, instance_names: Vec<String>, verbosity_level: i32) -> StartRequest {
        StartRequest {
            instance_names,
            verbosity_level,
        }
    }
}
