use clap::{Parser, Subcommand};
use std::fmt::{Display, Formatter};
use std::future::Future;

use crate::{dispatch::Transport, return_code::ReturnCode};

pub mod delete;
pub mod instance;
pub mod recover;
pub mod restart;
pub mod start;
pub mod stop;
pub mod suspend;

use instance::{InstanceCommand, Session};

#[derive(Parser, Debug)]
#[command(
    name = "vesselctl",
    about = "Vessel instance lifecycle control",
    version,
    disable_help_subcommand = true
)]
pub struct VesselCtlCmd {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start instances
    Start(start::Cmd),
    /// Stop running instances
    Stop(stop::Cmd),
    /// Suspend running instances
    Suspend(suspend::Cmd),
    /// Restart instances
    Restart(restart::Cmd),
    /// Delete instances
    Delete(delete::Cmd),
    /// Recover deleted instances
    Recover(recover::Cmd),
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Start(cmd) => write!(f, "start {}", cmd),
            Command::Stop(cmd) => write!(f, "stop {}", cmd),
            Command::Suspend(cmd) => write!(f, "suspend {}", cmd),
            Command::Restart(cmd) => write!(f, "restart {}", cmd),
            Command::Delete(cmd) => write!(f, "delete {}", cmd),
            Command::Recover(cmd) => write!(f, "recover {}", cmd),
        }
    }
}

impl Command {
    pub async fn run<T, I>(&self, session: &mut Session<'_, T>, interrupt: I) -> ReturnCode
    where
        T: Transport,
        I: Future<Output = ()>,
    {
        match self {
            Command::Start(cmd) => instance::run(cmd, session, interrupt).await,
            Command::Stop(cmd) => instance::run(cmd, session, interrupt).await,
            Command::Suspend(cmd) => instance::run(cmd, session, interrupt).await,
            Command::Restart(cmd) => instance::run(cmd, session, interrupt).await,
            Command::Delete(cmd) => instance::run(cmd, session, interrupt).await,
            Command::Recover(cmd) => instance::run(cmd, session, interrupt).await,
        }
    }
}

/// Subcommand name and whether it falls back to the primary instance.
pub fn instance_subcommands() -> [(&'static str, bool); 6] {
    [
        (start::Cmd::NAME, start::Cmd::USES_PRIMARY),
        (stop::Cmd::NAME, stop::Cmd::USES_PRIMARY),
        (suspend::Cmd::NAME, suspend::Cmd::USES_PRIMARY),
        (restart::Cmd::NAME, restart::Cmd::USES_PRIMARY),
        (delete::Cmd::NAME, delete::Cmd::USES_PRIMARY),
        (recover::Cmd::NAME, recover::Cmd::USES_PRIMARY),
    ]
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        VesselCtlCmd::command().debug_assert();
    }

    #[test]
    fn every_instance_subcommand_exists() {
        let command = VesselCtlCmd::command();

        for (name, _) in instance_subcommands() {
            assert!(
                command.find_subcommand(name).is_some(),
                "missing subcommand {name}"
            );
        }
    }
}
