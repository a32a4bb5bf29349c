fn main() {
    if let Err(err) = csv_normalizer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
