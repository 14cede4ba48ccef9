use std::fmt;

/// Pipeline stages, in order. `Failed` is reachable from `Initializing`
/// (strict policy) and `Acquiring` (strict policy or cancellation), and from
/// `Multiplying` on a shape mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Initializing,
    Acquiring,
    Multiplying,
    Digesting,
    Verifying,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Initializing => "initializing",
            PipelineState::Acquiring => "acquiring",
            PipelineState::Multiplying => "multiplying",
            PipelineState::Digesting => "digesting",
            PipelineState::Verifying => "verifying",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_displays_lowercase() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
        assert_eq!(PipelineState::Acquiring.to_string(), "acquiring");
        assert_eq!(PipelineState::Failed.to_string(), "failed");
    }
}
