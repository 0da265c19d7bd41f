//! End-to-end pipeline scenarios checked against the closed-form cycle totals.

use pipeline_core::{
    CycleReport, DependencyGraph, InstructionId, InstructionRecord, Pipeline, Stage, TraceEvent,
    ALPHABET_LEN, MAX_INSTRUCTIONS,
};
use proptest::prelude::*;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

fn slot_id(index: usize) -> InstructionId {
    InstructionId::from_slot_index(index).expect("index inside alphabet")
}

/// Builds a program of `hazards.len()` instructions where `hazards[i]` makes
/// instruction `i` depend on instruction `i - 1`.
fn program(hazards: &[bool]) -> DependencyGraph {
    let mut graph = DependencyGraph::with_capacity(MAX_INSTRUCTIONS);
    for index in 0..hazards.len() {
        graph.add_node(slot_id(index));
    }
    for (index, &hazard) in hazards.iter().enumerate().skip(1) {
        if hazard {
            let (from, to) = (slot_id(index), slot_id(index - 1));
            graph.add_edge(from, to, from.distance_from(to));
        }
    }
    graph
}

fn loaded_pipeline(graph: &DependencyGraph) -> Pipeline {
    let mut pipeline = Pipeline::new();
    for id in graph.ids() {
        pipeline.insert_instruction(InstructionRecord::new(id, graph.depends_on_predecessor(id)));
    }
    pipeline
}

/// What one productive cycle left behind.
struct CycleSample {
    stalls: usize,
    in_execute: usize,
    execute_holds_only_bubbles: bool,
}

struct RunSummary {
    productive_cycles: usize,
    samples: Vec<CycleSample>,
}

fn run(pipeline: &mut Pipeline) -> RunSummary {
    let mut samples = Vec::new();

    loop {
        let mut events: Vec<TraceEvent> = Vec::new();
        if !pipeline.advance_cycle_traced(&mut events) {
            break;
        }

        let snapshot = pipeline.snapshot();
        let executing: Vec<_> = snapshot
            .iter()
            .filter(|entry| entry.stage == Stage::Execute)
            .collect();
        samples.push(CycleSample {
            stalls: events
                .iter()
                .filter(|event| matches!(event, TraceEvent::StallInjected { .. }))
                .count(),
            in_execute: executing.len(),
            execute_holds_only_bubbles: executing.iter().all(|entry| entry.is_bubble()),
        });
    }

    RunSummary {
        productive_cycles: samples.len(),
        samples,
    }
}

#[test]
fn worked_example_runs_in_eleven_cycles() {
    // a b* c d e* f
    let graph = program(&[false, true, false, false, true, false]);
    let report = CycleReport::from_graph(&graph);
    let mut pipeline = loaded_pipeline(&graph);

    let summary = run(&mut pipeline);

    assert_eq!(report.sequential_cycles, 24);
    assert_eq!(report.ideal_cycles, 9);
    assert_eq!(summary.productive_cycles, 11);
    assert_eq!(summary.productive_cycles, report.actual_cycles);
    assert_eq!(pipeline.stall_count(), 2);
    assert_eq!(pipeline.completed_count(), 6);
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(9)]
#[case(ALPHABET_LEN)]
fn independent_program_needs_k_plus_three(#[case] len: usize) {
    let graph = program(&vec![false; len]);
    let mut pipeline = loaded_pipeline(&graph);

    let summary = run(&mut pipeline);

    assert_eq!(summary.productive_cycles, len + 3);
    assert_eq!(pipeline.stall_count(), 0);
}

#[rstest]
#[case(2)]
#[case(5)]
#[case(12)]
fn fully_chained_program_needs_two_k_plus_two(#[case] len: usize) {
    let mut hazards = vec![true; len];
    hazards[0] = false;
    let graph = program(&hazards);
    let mut pipeline = loaded_pipeline(&graph);

    let summary = run(&mut pipeline);

    assert_eq!(summary.productive_cycles, 2 * len + 2);
    assert_eq!(
        summary.productive_cycles,
        CycleReport::from_graph(&graph).worst_case_cycles
    );
}

#[test]
fn stall_places_the_bubble_alone_in_execute() {
    // a b* c d e* f
    let graph = program(&[false, true, false, false, true, false]);
    let mut pipeline = loaded_pipeline(&graph);

    let summary = run(&mut pipeline);

    let stalled: Vec<_> = summary
        .samples
        .iter()
        .enumerate()
        .filter(|(_, sample)| sample.stalls == 1)
        .map(|(index, sample)| (index + 1, sample.in_execute, sample.execute_holds_only_bubbles))
        .collect();
    assert_eq!(stalled, vec![(4, 1, true), (8, 1, true)]);
}

#[test]
fn bubbles_never_count_as_completed() {
    let graph = program(&[false, true, true]);
    let mut pipeline = loaded_pipeline(&graph);

    run(&mut pipeline);
    for _ in 0..6 {
        pipeline.advance_cycle();
    }

    assert_eq!(pipeline.completed_count(), 3);
    assert!(pipeline.in_flight().all(InstructionRecord::is_bubble));
}

#[test]
fn empty_program_is_never_productive() {
    let graph = DependencyGraph::default();
    let mut pipeline = loaded_pipeline(&graph);

    assert!(!pipeline.advance_cycle());
    assert_eq!(pipeline.cycle(), 1);
    assert_eq!(pipeline.completed_count(), 0);
}

proptest! {
    #[test]
    fn simulation_agrees_with_closed_form(tail in prop::collection::vec(any::<bool>(), 0..ALPHABET_LEN)) {
        let mut hazards = vec![false];
        hazards.extend(tail);
        let graph = program(&hazards);
        let report = CycleReport::from_graph(&graph);
        let mut pipeline = loaded_pipeline(&graph);

        let summary = run(&mut pipeline);

        prop_assert_eq!(summary.productive_cycles, report.actual_cycles);
        prop_assert_eq!(pipeline.stall_count() as usize, report.stalls_required);
        prop_assert_eq!(pipeline.completed_count() as usize, report.instructions);
        prop_assert!(summary.productive_cycles <= report.worst_case_cycles);
    }

    #[test]
    fn stalled_cycles_hold_exactly_one_bubble_in_execute(
        tail in prop::collection::vec(any::<bool>(), 0..ALPHABET_LEN)
    ) {
        let mut hazards = vec![false];
        hazards.extend(tail);
        let graph = program(&hazards);
        let mut pipeline = loaded_pipeline(&graph);

        let summary = run(&mut pipeline);

        for sample in &summary.samples {
            prop_assert!(sample.stalls <= 1);
            prop_assert!(sample.in_execute <= 1);
            if sample.stalls == 1 {
                prop_assert_eq!(sample.in_execute, 1);
                prop_assert!(sample.execute_holds_only_bubbles);
            }
        }
    }
}
