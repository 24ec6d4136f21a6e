mod state;
mod ui;

use eframe::egui;
use state::AppState;
use std::path::PathBuf;

const LAST_PATH_KEY: &str = "last_path";

struct TreemapApp {
    state: AppState,
}

impl TreemapApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut state = AppState::new();
        let last: Option<String> = cc
            .storage
            .and_then(|s| eframe::get_value(s, LAST_PATH_KEY));
        if let Some(path) = last.map(PathBuf::from).filter(|p| p.is_file()) {
            state.start_load(path);
        }
        Self { state }
    }
}

impl eframe::App for TreemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(path) = &self.state.path {
            eframe::set_value(storage, LAST_PATH_KEY, &path.display().to_string());
        }
    }
}

fn main() -> eframe::Result<()> {
    treemap_core::logging::init("info");
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Treemap Viewer",
        options,
        Box::new(|cc| Ok(Box::new(TreemapApp::new(cc)))),
    )
}
