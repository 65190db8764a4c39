fn main() -> std::process::ExitCode {
    server::bootstrap::run_binary("connect-editor", server::run_connect_editor())
}
