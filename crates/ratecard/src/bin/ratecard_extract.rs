//! ratecard-extract - thin wrapper around `ratecard::cmd::extract_cmd`.

fn main() -> std::process::ExitCode {
    ratecard::cmd::extract_cmd::main()
}
