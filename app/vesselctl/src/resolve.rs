use thiserror::Error;

/// What a command targets when no instance name was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback<'a> {
    /// Use the primary instance. `None` when the primary instance is disabled.
    Primary(Option<&'a str>),
    /// Never assume an instance.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceSelection {
    /// Every instance known to the daemon. Sent as an empty name list.
    All,
    /// Explicit names in the order given, duplicates included.
    Names(Vec<String>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("name and --all are mutually exclusive")]
    NameAndAllConflict,

    #[error("primary instance disabled, need an instance name or --all")]
    PrimaryDisabled,

    #[error("name argument or --all is required")]
    MissingName,
}

/// Turns positional names and `--all` into the set of instances a request
/// targets.
///
/// `allow_empty` lets a request with no names and no fallback through as an
/// empty name list.
pub fn resolve_instance_names(
    names: &[String],
    all: bool,
    fallback: Fallback<'_>,
    allow_empty: bool,
) -> Result<InstanceSelection, ResolveError> {
    if all && !names.is_empty() {
        return Err(ResolveError::NameAndAllConflict);
    }

    if !names.is_empty() {
        return Ok(InstanceSelection::Names(names.to_vec()));
    }

    if all {
        return Ok(InstanceSelection::All);
    }

    match fallback {
        Fallback::Primary(Some(primary)) => {
            Ok(InstanceSelection::Names(vec![primary.to_string()]))
        }
        _ if allow_empty => Ok(InstanceSelection::Names(Vec::new())),
        Fallback::Primary(None) => Err(ResolveError::PrimaryDisabled),
        Fallback::Nothing => Err(ResolveError::MissingName),
    }
}

impl InstanceSelection {
    pub fn into_wire(self) -> Vec<String> {
        match self {
            InstanceSelection::All => Vec::new(),
            InstanceSelection::Names(names) => names,
        }
    }

    /// Progress text such as "Suspending foo" or "Suspending all instances".
    pub fn action_message(&self, verb: &str) -> String {
        match self {
            InstanceSelection::All => format!("{verb} all instances"),
            InstanceSelection::Names(names) => match names.as_slice() {
                [name] => format!("{verb} {name}"),
                _ => format!("{verb} requested instances"),
            },
        }
    }
}
