use wtsweep::{build_cli, init_logging, run_command};

fn main() {
    init_logging();

    let app = build_cli();
    let matches = app.get_matches();

    if let Err(e) = run_command(&matches) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}
