use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

/// Well-known CJK system fonts, tried in order when no font is configured.
const SYSTEM_CJK_FONTS: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

const FONT_NAME: &str = "cjk-fallback";

/// egui's bundled fonts have no Chinese glyphs. Register the configured font,
/// or the first system CJK font found, as a fallback for both families.
pub fn install_cjk_font(ctx: &egui::Context, configured: Option<&Path>) {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_CJK_FONTS.iter().map(PathBuf::from));

    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::info!("Using {} for CJK text", path.display());
                let mut fonts = FontDefinitions::default();
                fonts
                    .font_data
                    .insert(FONT_NAME.to_owned(), Arc::new(FontData::from_owned(bytes)));
                for family in [FontFamily::Proportional, FontFamily::Monospace] {
                    fonts
                        .families
                        .entry(family)
                        .or_default()
                        .push(FONT_NAME.to_owned());
                }
                ctx.set_fonts(fonts);
                return;
            }
            Err(e) => log::debug!("No font at {}: {e}", path.display()),
        }
    }
    log::warn!("No CJK font found; Chinese text will not render. Set \"font_path\" in the config.");
}
