fn main() {
    if let Err(e) = orbital_cloud::platform::start() {
        eprintln!("Viewer failed: {e}");
        std::process::exit(1);
    }
}
