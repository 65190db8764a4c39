fn main() -> std::process::ExitCode {
    server::bootstrap::run_binary("docstore", server::run())
}
