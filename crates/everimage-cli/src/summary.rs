use console::Style;
use everimage_core::pipeline::{EditStep, EverimageConfig, Recipe};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_recipe_summary(recipe: &Recipe, config: &EverimageConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Everimage Recipe"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(recipe.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(recipe.output.display())
    );
    let font = recipe.font.as_ref().or(config.fonts.default.as_ref());
    match font {
        Some(path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Font"),
            s.path.apply_to(path.display())
        ),
        None if recipe.needs_font() => println!(
            "  {:<14}{}",
            s.label.apply_to("Font"),
            s.disabled.apply_to("missing")
        ),
        None => {}
    }
    for family in recipe.font_families() {
        match config.fonts.families.get(family) {
            Some(path) => println!(
                "  {:<14}{}",
                s.label.apply_to(family),
                s.path.apply_to(path.display())
            ),
            None => println!(
                "  {:<14}{}",
                s.label.apply_to(family),
                s.disabled.apply_to("not configured, using the default font")
            ),
        }
    }
    println!();

    println!("  {}", s.header.apply_to("Steps"));
    if recipe.steps.is_empty() {
        println!("    {}", s.disabled.apply_to("none (re-encode only)"));
    }
    for (i, step) in recipe.steps.iter().enumerate() {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("{}.", i + 1)),
            s.method.apply_to(step)
        );
        if let Some(detail) = step_detail(step, config) {
            println!("    {:<12}{}", "", s.value.apply_to(detail));
        }
    }
    println!();
}

fn step_detail(step: &EditStep, config: &EverimageConfig) -> Option<String> {
    match step {
        EditStep::Brush {
            size,
            feather,
            strength,
            spacing,
            ..
        } => {
            let brush = config.brush;
            let mut detail = format!(
                "size {}, feather {}",
                size.unwrap_or(brush.size),
                feather.unwrap_or(brush.feather)
            );
            if let Some(strength) = strength {
                detail.push_str(&format!(", strength {strength}"));
            }
            if let Some(spacing) = spacing.or(brush.spacing) {
                detail.push_str(&format!(", spacing {spacing}"));
            }
            Some(detail)
        }
        EditStep::Watermark { settings, .. } => Some(format!(
            "opacity {}%, scale {}%, rotation {}°, {:?}",
            settings.opacity, settings.scale, settings.rotation, settings.position
        )),
        EditStep::Text { layers } => Some(
            layers
                .iter()
                .map(|l| format!("\"{}\" @ {},{}", l.text, l.x, l.y))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        _ => None,
    }
}
