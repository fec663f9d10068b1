fn main() {
    if let Err(err) = csv_metagen::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
