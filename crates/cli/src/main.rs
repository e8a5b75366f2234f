fn main() {
    if let Err(e) = hostbound_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
