/// Pipeline stage of one in-flight record.
///
/// Stages progress in declaration order and never move backwards.
/// `Completed` only marks a record for retirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Stage {
    /// Admitted but not yet fetched.
    #[default]
    Uninitialized,
    /// Instruction fetch.
    Fetch,
    /// Instruction decode.
    Decode,
    /// Execute; operand reads happen here.
    Execute,
    /// Write-back; results become visible after this stage.
    WriteBack,
    /// Finished and awaiting retirement.
    Completed,
}

impl Stage {
    /// Stage reached after one unconditional advance.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Uninitialized => Self::Fetch,
            Self::Fetch => Self::Decode,
            Self::Decode => Self::Execute,
            Self::Execute => Self::WriteBack,
            Self::WriteBack | Self::Completed => Self::Completed,
        }
    }

    /// Returns true for the four stages that occupy a pipeline slot.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(
            self,
            Self::Fetch | Self::Decode | Self::Execute | Self::WriteBack
        )
    }

    /// Conventional two-letter mnemonic for visible stages.
    #[must_use]
    pub const fn mnemonic(self) -> Option<&'static str> {
        match self {
            Self::Fetch => Some("IF"),
            Self::Decode => Some("ID"),
            Self::Execute => Some("EX"),
            Self::WriteBack => Some("WB"),
            Self::Uninitialized | Self::Completed => None,
        }
    }
}
