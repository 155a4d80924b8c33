fn main() {
    if let Err(err) = patent_refs::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
