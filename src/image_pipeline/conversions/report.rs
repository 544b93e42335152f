use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::image_pipeline::common::types::Dpi;
use crate::image_pipeline::loader::SkippedFile;
use crate::image_pipeline::tiff::WriteOutcome;

/// Where a run currently is; a run only moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    Loading,
    Converting,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Loading => "loading",
            PipelineStage::Converting => "converting",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: PipelineStage,
    pub duration: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct StageTimings {
    steps: Vec<StageTiming>,
    by_stage: HashMap<PipelineStage, Duration>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: PipelineStage, duration: Duration) {
        self.steps.push(StageTiming { stage, duration });
        *self.by_stage.entry(stage).or_insert(Duration::ZERO) += duration;
    }

    pub fn total(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get(&self, stage: PipelineStage) -> Option<Duration> {
        self.by_stage.get(&stage).copied()
    }

    pub fn steps(&self) -> &[StageTiming] {
        &self.steps
    }
}

/// Times one stage of a run
pub struct StageTimer {
    start: Instant,
    stage: PipelineStage,
}

impl StageTimer {
    pub fn start(stage: PipelineStage) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    pub fn stop(self, timings: &mut StageTimings) {
        timings.record(self.stage, self.start.elapsed());
    }
}

/// Summary of one folder to TIFF run
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub stage: PipelineStage,
    pub pages: usize,
    pub skipped: Vec<SkippedFile>,
    pub dpi: Dpi,
    pub outcome: WriteOutcome,
    pub timings: StageTimings,
}

impl ProcessReport {
    pub fn wrote_file(&self) -> bool {
        matches!(self.outcome, WriteOutcome::Written { .. })
    }
}
