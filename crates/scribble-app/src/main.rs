//! Command-line entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Scribble");

    if let Err(e) = scribble_app::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
