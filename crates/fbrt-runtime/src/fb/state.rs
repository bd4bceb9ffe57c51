use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

/// Lifecycle state of a function block instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FbState {
    /// Created or reset; events are rejected.
    #[default]
    Idle,
    /// Events are processed.
    Running,
    /// Events are rejected until started again.
    Stopped,
    /// Events are rejected; the instance waits for deletion or reset.
    Killed,
}

impl FbState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Stopped => "STOPPED",
            Self::Killed => "KILLED",
        }
    }
}

impl fmt::Display for FbState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Management command applied by the containing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MgmCommand {
    Start,
    Stop,
    Kill,
    Reset,
}

impl MgmCommand {
    /// State reached when the command is applied in `state`, if allowed.
    #[must_use]
    pub fn target_state(self, state: FbState) -> Option<FbState> {
        match (self, state) {
            (Self::Start, FbState::Idle | FbState::Stopped) => Some(FbState::Running),
            (Self::Stop, FbState::Running) => Some(FbState::Stopped),
            (Self::Kill, FbState::Running) => Some(FbState::Killed),
            (Self::Reset, FbState::Stopped | FbState::Killed) => Some(FbState::Idle),
            _ => None,
        }
    }
}

impl FromStr for MgmCommand {
    type Err = SmolStr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "START" => Ok(Self::Start),
            "STOP" => Ok(Self::Stop),
            "KILL" => Ok(Self::Kill),
            "RESET" => Ok(Self::Reset),
            _ => Err(SmolStr::new(s)),
        }
    }
}

/// Response code returned to the management command dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MgmResponse {
    Ready,
    InvalidState,
    UnsupportedCommand,
    NoSuchObject,
}

impl MgmResponse {
    #[must_use]
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

impl fmt::Display for MgmResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "RDY",
            Self::InvalidState => "INVALID_STATE",
            Self::UnsupportedCommand => "UNSUPPORTED_CMD",
            Self::NoSuchObject => "NO_SUCH_OBJECT",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        assert_eq!(MgmCommand::Start.target_state(FbState::Idle), Some(FbState::Running));
        assert_eq!(MgmCommand::Start.target_state(FbState::Killed), None);
        assert_eq!(MgmCommand::Kill.target_state(FbState::Stopped), None);
        assert_eq!(MgmCommand::Reset.target_state(FbState::Killed), Some(FbState::Idle));
        assert_eq!(MgmCommand::Reset.target_state(FbState::Running), None);
    }

    #[test]
    fn parses_command_names() {
        assert_eq!("start".parse::<MgmCommand>(), Ok(MgmCommand::Start));
        assert_eq!(" RESET ".parse::<MgmCommand>(), Ok(MgmCommand::Reset));
        assert!("DELETE".parse::<MgmCommand>().is_err());
    }
}
