use std::path::Path;

use eframe::egui;
use score_explorer::app::ScoreExplorerApp;
use score_explorer::config::{CONFIG_FILE, Config};

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Score Explorer – 投档线查询",
        options,
        Box::new(|cc| Ok(Box::new(ScoreExplorerApp::new(cc, config)))),
    )
}
