use iterdns_domain::{ResolutionTrace, StepRecord};
use std::time::Instant;

/// Append-only builder of a [`ResolutionTrace`].
///
/// Assigns step indices as records arrive. Traces of nested resolutions are
/// spliced in with their indices shifted to continue this recorder's
/// sequence, so the flattened trace stays in the order probes happened.
#[derive(Debug)]
pub struct TraceRecorder {
    records: Vec<StepRecord>,
    started: Instant,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn next_index(&self) -> usize {
        self.records.len() + 1
    }

    pub fn record(&mut self, mut step: StepRecord) -> usize {
        step.step_index = self.next_index();
        self.records.push(step);
        self.records.len()
    }

    pub fn splice(&mut self, sub_trace: ResolutionTrace) {
        for step in sub_trace.into_records() {
            self.record(step);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self) -> ResolutionTrace {
        ResolutionTrace::new(self.records, self.started.elapsed())
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}
