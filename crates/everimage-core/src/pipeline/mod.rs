pub mod config;
mod orchestrator;
pub mod recipe;
mod types;

pub use config::EverimageConfig;
pub use orchestrator::{apply_step, run_recipe, run_recipe_reported};
pub use recipe::{EditStep, Recipe};
pub use types::{ProgressReporter, RecipeOutput};
