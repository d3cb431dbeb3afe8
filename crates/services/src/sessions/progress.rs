/// Aggregated view of run progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// Zero-based position; global across sections in a marathon.
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total
    }
}
