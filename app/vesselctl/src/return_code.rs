use std::process::ExitCode;

/// Every command path ends in one of these; the numeric value is the process
/// exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReturnCode {
    Ok = 0,
    CommandLineError = 1,
    CommandFail = 2,
}

impl From<ReturnCode> for ExitCode {
    fn from(code: ReturnCode) -> Self {
        ExitCode::from(code as u8)
    }
}
