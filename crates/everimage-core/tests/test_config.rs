mod common;

use everimage_core::brush::BrushMode;
use everimage_core::compress::CompressionPreset;
use everimage_core::error::EverimageError;
use everimage_core::io::image_io::{load_bitmap, save_bitmap};
use everimage_core::layers::{FontBook, Position};
use everimage_core::pipeline::{apply_step, run_recipe, EditStep, EverimageConfig, Recipe};
use everimage_core::transform::ResizeFilter;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_default_config_toml_roundtrip() {
    let config = EverimageConfig::default();
    let text = config.to_toml().unwrap();
    assert_eq!(EverimageConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_empty_config_is_default() {
    assert_eq!(
        EverimageConfig::from_toml("").unwrap(),
        EverimageConfig::default()
    );
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let config = EverimageConfig::from_toml(
        r#"
[brush]
mode = "Mosaic"
size = 40

[compression]
preset = "Heavy"
quality = 55
"#,
    )
    .unwrap();
    assert_eq!(config.brush.mode, BrushMode::Mosaic);
    assert_eq!(config.brush.size, 40);
    assert_eq!(config.brush.feather, 10);
    assert_eq!(config.compression.preset, CompressionPreset::Heavy);
    let budget = config.compression.budget();
    assert_eq!(budget.max_size_mb, 0.5);
    assert!((budget.quality - 0.55).abs() < 1e-6);
    assert_eq!(config.convert.jpeg_quality, 95);
}

#[test]
fn test_invalid_config_is_config_error() {
    let err = EverimageConfig::from_toml("[brush]\nsize = \"big\"").unwrap_err();
    assert!(matches!(err, EverimageError::Config(_)));
}

#[test]
fn test_missing_font_is_font_error() {
    let config = EverimageConfig::default();
    assert!(matches!(
        config.fonts.load_book(None, []),
        Err(EverimageError::Font(_))
    ));
}

#[test]
fn test_font_families_parse() {
    let config = EverimageConfig::from_toml(
        r#"
[fonts]
default = "/fonts/Arial.ttf"

[fonts.families]
Roboto = "/fonts/Roboto.ttf"
"Playfair Display" = "/fonts/Playfair.ttf"
"#,
    )
    .unwrap();
    assert_eq!(
        config.fonts.default.as_deref(),
        Some(std::path::Path::new("/fonts/Arial.ttf"))
    );
    assert_eq!(config.fonts.families.len(), 2);
    assert_eq!(
        config.fonts.families["Playfair Display"],
        std::path::PathBuf::from("/fonts/Playfair.ttf")
    );
}

#[test]
fn test_missing_family_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = EverimageConfig::from_toml(&format!(
        "[fonts.families]\nRoboto = {:?}\n",
        dir.path().join("missing.ttf")
    ))
    .unwrap();
    assert!(matches!(
        config.fonts.load_book(None, ["Roboto"]),
        Err(EverimageError::Io(_))
    ));
}

#[test]
fn test_unconfigured_family_without_default_is_font_error() {
    let config = EverimageConfig::default();
    assert!(matches!(
        config.fonts.load_book(None, ["Roboto"]),
        Err(EverimageError::Font(_))
    ));
}

#[test]
fn test_configured_families_load_into_book() {
    let Some(path) = common::system_font_path() else {
        return;
    };
    let mut config = EverimageConfig::default();
    config.fonts.families.insert("Sans".into(), path);
    let book = config.fonts.load_book(None, ["Sans", "Sans", "Serif"]).unwrap();
    assert!(book.contains("Sans"));
    assert!(!book.contains("Serif"));
    assert!(book.get(Some("Sans")).is_ok());
    // No default face: unnamed layers cannot be drawn.
    assert!(matches!(book.get(None), Err(EverimageError::Font(_))));
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

const RECIPE: &str = r#"
input = "in.png"
output = "out/result.png"

[[steps]]
op = "crop"
x = 2
y = 2
width = 20
height = 10

[[steps]]
op = "rotate"
degrees = 90

[[steps]]
op = "brush"
mode = "Mosaic"
points = [[5, 5], [5, 15]]
size = 8

[[steps]]
op = "erase"
points = [[0, 0]]
radius = 5

[[steps]]
op = "watermark"
image = "logo.png"
settings = { opacity = 100, position = "top-left" }
"#;

#[test]
fn test_recipe_parses_every_step_kind() {
    let recipe: Recipe = toml::from_str(RECIPE).unwrap();
    assert_eq!(recipe.steps.len(), 5);
    assert_eq!(
        recipe.steps[0],
        EditStep::Crop {
            x: 2,
            y: 2,
            width: 20,
            height: 10
        }
    );
    match &recipe.steps[2] {
        EditStep::Brush {
            mode, points, size, ..
        } => {
            assert_eq!(*mode, BrushMode::Mosaic);
            assert_eq!(points, &vec![[5.0, 5.0], [5.0, 15.0]]);
            assert_eq!(*size, Some(8));
        }
        other => panic!("unexpected {other:?}"),
    }
    match &recipe.steps[4] {
        EditStep::Watermark { settings, .. } => {
            assert_eq!(settings.position, Position::TopLeft);
            assert_eq!(settings.opacity, 100.0);
            assert_eq!(settings.scale, 100.0);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!recipe.needs_font());
}

#[test]
fn test_step_display() {
    let step = EditStep::Resize {
        width: Some(100),
        height: None,
        filter: ResizeFilter::default(),
    };
    assert_eq!(step.to_string(), "Resize 100xauto");
    assert_eq!(EditStep::Rotate { degrees: 45.0 }.to_string(), "Rotate 45°");
}

#[test]
fn test_text_steps_need_font() {
    let recipe: Recipe = toml::from_str(
        r#"
input = "a.png"
output = "b.png"

[[steps]]
op = "text"
layers = [{ text = "Hello" }]
"#,
    )
    .unwrap();
    assert!(recipe.needs_font());
}

#[test]
fn test_recipe_load_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edit.toml");
    std::fs::write(&path, RECIPE).unwrap();
    let recipe = Recipe::load(&path).unwrap();
    assert_eq!(recipe.input, dir.path().join("in.png"));
    assert_eq!(recipe.output, dir.path().join("out/result.png"));
    match &recipe.steps[4] {
        EditStep::Watermark { image, .. } => {
            assert_eq!(image.as_deref(), Some(dir.path().join("logo.png").as_path()))
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_run_recipe_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    save_bitmap(&common::gradient(40, 30), &dir.path().join("in.png")).unwrap();
    save_bitmap(&common::solid(4, 4, [255, 0, 0]), &dir.path().join("logo.png")).unwrap();
    let path = dir.path().join("edit.toml");
    std::fs::write(&path, RECIPE).unwrap();

    let recipe = Recipe::load(&path).unwrap();
    let output = run_recipe(&recipe, &EverimageConfig::default()).unwrap();

    // Cropped to 20x10, then turned a quarter.
    assert_eq!(output.bitmap.dimensions(), (10, 20));
    assert_eq!(output.history.len(), 6);
    assert!(!output.history.can_redo());
    assert_eq!(output.history.entries()[1].dimensions(), (20, 10));

    let written = load_bitmap(&recipe.output).unwrap();
    assert_eq!(written, output.bitmap);
    assert_eq!(
        std::fs::metadata(&recipe.output).unwrap().len() as usize,
        output.encoded_size
    );
    // The top-left mark is padded 20px in, off the 10px-wide canvas.
    assert_eq!(written.get(0, 0)[3], 0);
    assert!(written.pixels.pixels().all(|p| p.0 != [255, 0, 0, 255]));
}

#[test]
fn test_failed_step_is_numbered() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    save_bitmap(&common::solid(10, 10, [0, 0, 0]), &input).unwrap();
    let recipe = Recipe {
        input,
        output: dir.path().join("out.png"),
        font: None,
        steps: vec![
            EditStep::Rotate { degrees: 90.0 },
            EditStep::Crop {
                x: 5,
                y: 5,
                width: 10,
                height: 10,
            },
        ],
    };
    match run_recipe(&recipe, &EverimageConfig::default()) {
        Err(EverimageError::Recipe(msg)) => assert!(msg.starts_with("step 2 (Crop"), "{msg}"),
        other => panic!("unexpected {:?}", other.map(|o| o.encoded_size)),
    }
    assert!(!recipe.output.exists());
}

#[test]
fn test_svg_output_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    save_bitmap(&common::solid(4, 4, [0, 0, 0]), &input).unwrap();
    let recipe = Recipe {
        input,
        output: dir.path().join("out.svg"),
        font: None,
        steps: vec![],
    };
    assert!(matches!(
        run_recipe(&recipe, &EverimageConfig::default()),
        Err(EverimageError::UnsupportedConversion { .. })
    ));
}

#[test]
fn test_apply_step_brush_strength_overrides_both() {
    let img = common::checkerboard(30, 30, 1);
    let config = EverimageConfig::default();
    let step = EditStep::Brush {
        mode: BrushMode::Mosaic,
        points: vec![[15.0, 15.0]],
        size: Some(15),
        feather: Some(0),
        strength: Some(30),
        spacing: None,
    };
    let out = apply_step(&img, &step, &config, &FontBook::new()).unwrap();
    // One 30px cell covers the whole image; the checkerboard mean is grey.
    let p = out.get(3, 3);
    assert!(p[0] > 100 && p[0] < 155, "{p:?}");
}

#[test]
fn test_apply_text_step_without_font_fails() {
    let img = common::solid(10, 10, [0, 0, 0]);
    let step = EditStep::Text { layers: vec![] };
    assert!(matches!(
        apply_step(&img, &step, &EverimageConfig::default(), &FontBook::new()),
        Err(EverimageError::Font(_))
    ));
}

#[test]
fn test_recipe_font_families_are_collected() {
    let recipe: Recipe = toml::from_str(
        r#"
input = "in.png"
output = "out.png"

[[steps]]
op = "text"
layers = [
    { text = "a", font = "Roboto" },
    { text = "b" },
    { text = "c", font = "Lato" },
]

[[steps]]
op = "watermark"
text = { text = "mark", font = "Roboto" }
"#,
    )
    .unwrap();
    assert!(recipe.needs_font());
    assert_eq!(recipe.font_families(), vec!["Lato", "Roboto"]);
}
