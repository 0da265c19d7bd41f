//! Per-instruction pipeline state primitives.

/// Pipeline stage enumeration and transitions.
pub mod stage;
/// In-flight instruction records and bubbles.
pub mod record;

pub use record::InstructionRecord;
pub use stage::Stage;
