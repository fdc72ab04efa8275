fn main() {
    std::process::exit(queuemon::app::startup::startup());
}
