//! Four-stage in-order pipeline with single-cycle data-hazard stalls.
//!
//! The in-flight list is a deque ordered newest at the front and oldest at
//! the back. Each cycle admits one record at the front, walks the list from
//! back to front advancing stages, and retires at most one completed record
//! from the back.
//!
//! A record flagged data-dependent is held in Decode for one extra cycle: a
//! bubble already in Execute is slotted in directly behind it and the walk
//! stops, so newer records keep their stage for that cycle. Only one stall can
//! happen per cycle.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    InstructionRecord, PipelineStats, SnapshotEntry, Stage, TraceEvent, TraceSink, PIPELINE_DEPTH,
};

struct DiscardTrace;

impl TraceSink for DiscardTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// What happened to one record during the stage walk.
enum StepResult {
    Advanced,
    Stalled,
    Finished,
    Idle,
}

/// Cycle-driven pipeline simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    cycle: u32,
    stalls: u32,
    completed: u32,
    max_depth: usize,
    in_flight: VecDeque<InstructionRecord>,
    pending: VecDeque<InstructionRecord>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates an empty pipeline with the fixed four-stage depth.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cycle: 0,
            stalls: 0,
            completed: 0,
            max_depth: PIPELINE_DEPTH,
            in_flight: VecDeque::new(),
            pending: VecDeque::new(),
        }
    }

    /// Queues `record` behind every previously inserted record.
    ///
    /// Returns the number of records now waiting for admission.
    pub fn insert_instruction(&mut self, record: InstructionRecord) -> usize {
        self.pending.push_back(record);
        self.pending.len()
    }

    /// Simulates one clock cycle.
    ///
    /// Returns true while the cycle did productive work for a program
    /// instruction. Once it returns false the caller should stop: further
    /// calls keep admitting bubbles and counting cycles.
    pub fn advance_cycle(&mut self) -> bool {
        self.advance_cycle_traced(&mut DiscardTrace)
    }

    /// Simulates one clock cycle, reporting what happened to `sink`.
    pub fn advance_cycle_traced<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        self.cycle += 1;
        let cycle = self.cycle;
        let mut productive = self.admit(cycle, sink);

        let mut index = self.in_flight.len();
        while index > 0 {
            index -= 1;
            let record = &mut self.in_flight[index];
            let id = record.id();

            let result = match record.stage() {
                Stage::Decode if record.is_data_dependent() => {
                    record.clear_data_dependent();
                    StepResult::Stalled
                }
                Stage::Uninitialized | Stage::Fetch | Stage::Decode | Stage::Execute => {
                    record.advance();
                    StepResult::Advanced
                }
                Stage::WriteBack => {
                    record.advance();
                    StepResult::Finished
                }
                Stage::Completed => StepResult::Idle,
            };

            match result {
                StepResult::Advanced => productive |= id.is_some(),
                StepResult::Stalled => {
                    self.in_flight
                        .insert(index + 1, InstructionRecord::bubble_in(Stage::Execute));
                    self.stalls += 1;
                    productive |= id.is_some();
                    debug!(cycle, instruction = ?id, "data hazard, stall injected");
                    sink.on_event(TraceEvent::StallInjected { cycle, id });
                    break;
                }
                StepResult::Finished => {
                    if let Some(id) = id {
                        self.completed += 1;
                        sink.on_event(TraceEvent::Completed { cycle, id });
                    }
                }
                StepResult::Idle => {}
            }
        }

        self.retire(cycle, sink);
        trace!(cycle, productive, in_flight = self.in_flight.len(), "cycle done");
        productive
    }

    fn admit<S: TraceSink + ?Sized>(&mut self, cycle: u32, sink: &mut S) -> bool {
        if self.in_flight.len() > self.max_depth {
            return false;
        }

        if let Some(record) = self.pending.pop_front() {
            sink.on_event(TraceEvent::Admitted {
                cycle,
                id: record.id(),
            });
            self.in_flight.push_front(record);
            true
        } else {
            sink.on_event(TraceEvent::BubbleInjected { cycle });
            self.in_flight.push_front(InstructionRecord::bubble());
            false
        }
    }

    fn retire<S: TraceSink + ?Sized>(&mut self, cycle: u32, sink: &mut S) {
        let oldest_done = self
            .in_flight
            .back()
            .is_some_and(|record| record.stage() == Stage::Completed);
        if !oldest_done {
            return;
        }
        if let Some(retired) = self.in_flight.pop_back() {
            sink.on_event(TraceEvent::Retired {
                cycle,
                id: retired.id(),
            });
        }
    }

    /// Cycles simulated so far.
    #[must_use]
    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Stalls injected so far.
    #[must_use]
    pub const fn stall_count(&self) -> u32 {
        self.stalls
    }

    /// Program instructions that reached `Completed`.
    #[must_use]
    pub const fn completed_count(&self) -> u32 {
        self.completed
    }

    /// In-flight depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Records still waiting for admission.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// In-flight records from newest to oldest.
    pub fn in_flight(&self) -> impl Iterator<Item = &InstructionRecord> + '_ {
        self.in_flight.iter()
    }

    /// Counter values at this point.
    #[must_use]
    pub const fn stats(&self) -> PipelineStats {
        PipelineStats {
            cycles: self.cycle,
            stalls: self.stalls,
            completed: self.completed,
        }
    }

    /// Occupied slots from newest to oldest, skipping records that are not
    /// yet fetched or already completed.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.in_flight
            .iter()
            .filter(|record| record.stage().is_visible())
            .map(|record| SnapshotEntry {
                id: record.id(),
                stage: record.stage(),
            })
            .collect()
    }
}
