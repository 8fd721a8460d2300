fn main() {
    if let Err(err) = flowlayout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
