use reddown::app::ReddownApp;
use reddown::constant;
use reddown::ui;
use std::path::PathBuf;

fn main() -> eframe::Result {
    tracing_subscriber::fmt::init();

    let initial_file = std::env::args().nth(1).map(PathBuf::from);
    let options = ui::viewport::build_viewport();

    eframe::run_native(
        constant::DEFAULT_WINDOW_TITLE,
        options,
        Box::new(|cc| Ok(Box::new(ReddownApp::new(cc, initial_file)))),
    )
}
