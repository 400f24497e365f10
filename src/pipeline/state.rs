//! Pipeline states and the trace of a single run.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Launching,
    Navigating,
    Injecting,
    /// Terminal: the editor rejected the definition.
    Invalid,
    RenderOk,
    Exporting,
    AwaitingSecondaryPage,
    ExtractingImage,
    /// Terminal: image extracted.
    Done,
    Cleanup,
    /// Terminal: infrastructure or timeout failure.
    Failed,
}

impl PipelineState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineState::Invalid | PipelineState::Done | PipelineState::Failed
        )
    }

    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Idle, Launching) => true,
            (Launching, Navigating) => true,
            (Navigating, Injecting) => true,
            (Injecting, Invalid | RenderOk) => true,
            (RenderOk, Exporting) => true,
            (Exporting, AwaitingSecondaryPage) => true,
            (AwaitingSecondaryPage, ExtractingImage) => true,
            (ExtractingImage, Done) => true,
            (Cleanup, Failed) => true,
            (from, Cleanup) => !from.is_terminal() && from != Idle && from != Cleanup,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Ordered record of the states one run went through, starting at `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTrace {
    states: Vec<PipelineState>,
}

impl Default for StateTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl StateTrace {
    pub fn new() -> Self {
        Self {
            states: vec![PipelineState::Idle],
        }
    }

    pub fn current(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::Idle)
    }

    pub fn enter(&mut self, next: PipelineState) {
        let current = self.current();
        debug_assert!(
            current.can_transition_to(next),
            "illegal pipeline transition {current} -> {next}"
        );
        if !current.can_transition_to(next) {
            log::error!("illegal pipeline transition {current} -> {next}");
        }
        log::trace!("pipeline: {current} -> {next}");
        self.states.push(next);
    }

    pub fn states(&self) -> &[PipelineState] {
        &self.states
    }

    pub fn terminal(&self) -> Option<PipelineState> {
        Some(self.current()).filter(|s| s.is_terminal())
    }

    pub fn visited(&self, state: PipelineState) -> bool {
        self.states.contains(&state)
    }
}
