use crate::{InstructionId, Stage, NOOP_SYMBOL};

/// One instruction (or bubble) moving through the pipeline.
///
/// A record without an identity is a bubble. Bubbles are never
/// data-dependent and never count as completed work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstructionRecord {
    id: Option<InstructionId>,
    stage: Stage,
    data_dependent: bool,
}

impl InstructionRecord {
    /// Creates a program instruction awaiting admission.
    ///
    /// `data_dependent` marks an instruction that needs the result of the
    /// instruction immediately before it and therefore stalls once in Decode.
    #[must_use]
    pub const fn new(id: InstructionId, data_dependent: bool) -> Self {
        Self {
            id: Some(id),
            stage: Stage::Uninitialized,
            data_dependent,
        }
    }

    /// Creates a bubble awaiting admission.
    #[must_use]
    pub const fn bubble() -> Self {
        Self::bubble_in(Stage::Uninitialized)
    }

    /// Creates a bubble that already occupies `stage`.
    #[must_use]
    pub const fn bubble_in(stage: Stage) -> Self {
        Self {
            id: None,
            stage,
            data_dependent: false,
        }
    }

    /// Instruction identity, or `None` for a bubble.
    #[must_use]
    pub const fn id(&self) -> Option<InstructionId> {
        self.id
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns true for bubbles.
    #[must_use]
    pub const fn is_bubble(&self) -> bool {
        self.id.is_none()
    }

    /// Returns true while a stall is still owed for this instruction.
    #[must_use]
    pub const fn is_data_dependent(&self) -> bool {
        self.data_dependent
    }

    /// Display symbol: the identity, or [`NOOP_SYMBOL`] for a bubble.
    #[must_use]
    pub fn symbol(&self) -> char {
        self.id.map_or(NOOP_SYMBOL, InstructionId::symbol)
    }

    pub(crate) fn advance(&mut self) {
        self.stage = self.stage.next();
    }

    pub(crate) fn clear_data_dependent(&mut self) {
        self.data_dependent = false;
    }
}
