use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Suffix appended to the base name of a downloaded result, per tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportSuffix {
    Compressed,
    Converted,
    WithText,
    Watermarked,
    Blur,
    Mosaic,
}

impl ExportSuffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportSuffix::Compressed => "compressed",
            ExportSuffix::Converted => "converted",
            ExportSuffix::WithText => "with-text",
            ExportSuffix::Watermarked => "watermarked",
            ExportSuffix::Blur => "blur",
            ExportSuffix::Mosaic => "mosaic",
        }
    }
}

/// Everything before the first `.` of the file name; `image` when empty.
pub fn base_name(file_name: &str) -> String {
    let leaf = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    match leaf.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => "image".to_string(),
    }
}

/// `<basename>-<suffix>.<ext>`
pub fn export_name(original: &str, suffix: ExportSuffix, ext: &str) -> String {
    format!("{}-{}.{}", base_name(original), suffix.as_str(), ext)
}

/// First output path claimed by more than one entry. `./a.png` and
/// `a.png` count as the same file.
pub fn find_duplicate<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Option<&'a Path> {
    let mut seen = HashSet::new();
    paths.into_iter().find(|path| {
        let key: PathBuf = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();
        !seen.insert(key)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_stops_at_first_dot() {
        assert_eq!(base_name("holiday.final.jpg"), "holiday");
        assert_eq!(base_name("/tmp/shots/cat.png"), "cat");
        assert_eq!(base_name(".hidden"), "image");
    }

    #[test]
    fn export_name_per_tool() {
        assert_eq!(
            export_name("cat.png", ExportSuffix::Mosaic, "png"),
            "cat-mosaic.png"
        );
        assert_eq!(
            export_name("cat.jpeg", ExportSuffix::WithText, "png"),
            "cat-with-text.png"
        );
    }

    #[test]
    fn duplicate_output_paths_are_found() {
        let a = PathBuf::from("out/holiday-compressed.jpeg");
        let b = PathBuf::from("out/cat-compressed.jpeg");
        let c = PathBuf::from("./out/holiday-compressed.jpeg");
        assert_eq!(
            find_duplicate([a.as_path(), b.as_path(), c.as_path()]),
            Some(c.as_path())
        );
        assert_eq!(find_duplicate([a.as_path(), b.as_path()]), None);
    }

    #[test]
    fn names_with_dotted_stems_collide() {
        let first = export_name("a.x.jpg", ExportSuffix::Compressed, "jpeg");
        let second = export_name("a.y.jpg", ExportSuffix::Compressed, "jpeg");
        let (p1, p2) = (Path::new("dir").join(first), Path::new("dir").join(second));
        assert_eq!(find_duplicate([p1.as_path(), p2.as_path()]), Some(p2.as_path()));
    }
}
