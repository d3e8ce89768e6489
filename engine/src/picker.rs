//! Question selection for the riddle gate.

/// Chooses which challenge of a pool of `len` to ask.
pub trait ChallengePicker {
    /// Index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniformly random choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl ChallengePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::random_range(0..len.max(1))
    }
}

/// Always picks the same index (wrapped into range).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl ChallengePicker for FixedPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.0 % len.max(1)
    }
}
