fn main() {
    recdesc::init_tracing();
    recdesc::cli::run();
}
