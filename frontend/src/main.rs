use log::{info, Level};

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let level = if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    };
    console_log::init_with_level(level).expect("error initializing log");

    info!("Starting application");
    portfolio_frontend::app::start();
}
