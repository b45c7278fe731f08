use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::rendering::domain::text_painter::TextPainter;
use crate::shared::asset_resolver::{self, AssetLookup};
use crate::shared::constants::{CAPTION_FONT_NAME, CAPTION_FONT_URL, SYSTEM_FONT_DIRS};

use super::bitmap_text_painter::BitmapTextPainter;
use super::fontdue_text_painter::FontdueTextPainter;

/// Creates the best available text painter, preferring a real font.
///
/// Looks for the caption font (explicit path, cache, system font folders,
/// then a download when allowed). If none can be loaded, falls back to the
/// built-in bitmap font. Logs which painter is selected.
pub fn create_text_painter(font_path: Option<&Path>, allow_download: bool) -> Arc<dyn TextPainter> {
    let search_dirs: Vec<PathBuf> = SYSTEM_FONT_DIRS.iter().map(PathBuf::from).collect();
    let lookup = AssetLookup {
        name: CAPTION_FONT_NAME,
        url: CAPTION_FONT_URL,
        explicit_path: font_path,
        search_dirs: &search_dirs,
        allow_download,
    };

    let loaded = asset_resolver::resolve(&lookup, None)
        .map_err(|e| e.to_string())
        .and_then(|path| {
            FontdueTextPainter::from_file(&path)
                .map(|painter| (path, painter))
                .map_err(|e| e.to_string())
        });

    match loaded {
        Ok((path, painter)) => {
            log::info!("Rendering captions with font {}", path.display());
            Arc::new(painter)
        }
        Err(e) => {
            log::warn!("No caption font available ({e}), using built-in bitmap font");
            Arc::new(BitmapTextPainter::new())
        }
    }
}
