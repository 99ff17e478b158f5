use crate::bitmap::Bitmap;
use crate::history::History;
use crate::pipeline::recipe::EditStep;

/// Result of running a recipe.
#[derive(Clone, Debug)]
pub struct RecipeOutput {
    pub bitmap: Bitmap,
    /// The decoded input followed by the bitmap after each step.
    pub history: History<Bitmap>,
    pub encoded_size: usize,
}

/// Progress callbacks for recipe runs. All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    /// Step `index` of `total` is about to run.
    fn begin_step(&self, _index: usize, _total: usize, _step: &EditStep) {}

    fn finish_step(&self) {}

    fn writing(&self) {}
}

pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
