fn main() {
    if let Err(error) = panink::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
