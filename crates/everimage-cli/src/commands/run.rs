use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use everimage_core::pipeline::{
    run_recipe_reported, EditStep, EverimageConfig, ProgressReporter, Recipe,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::print_recipe_summary;

#[derive(Args)]
pub struct RunArgs {
    /// Recipe file (TOML)
    pub recipe: PathBuf,

    /// Override the recipe's output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_step(&self, index: usize, total: usize, step: &EditStep) {
        self.pb.set_length(total as u64);
        self.pb.set_position(index as u64);
        self.pb.set_message(step.to_string());
    }

    fn finish_step(&self) {
        self.pb.inc(1);
    }

    fn writing(&self) {
        self.pb.set_message("Writing");
    }
}

pub fn run(args: &RunArgs, config: &EverimageConfig) -> Result<()> {
    let mut recipe = Recipe::load(&args.recipe)
        .with_context(|| format!("Failed to read recipe {}", args.recipe.display()))?;
    if let Some(ref output) = args.output {
        recipe.output = output.clone();
    }

    print_recipe_summary(&recipe, config);

    let pb = ProgressBar::new(recipe.steps.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { pb };

    let output = run_recipe_reported(&recipe, config, &reporter)?;

    reporter.pb.finish_with_message("Done");
    println!(
        "\nOutput saved to {} ({}x{})",
        recipe.output.display(),
        output.bitmap.width(),
        output.bitmap.height()
    );

    Ok(())
}
