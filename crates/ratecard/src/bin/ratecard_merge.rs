//! ratecard-merge - thin wrapper around `ratecard::cmd::merge_cmd`.

fn main() -> std::process::ExitCode {
    ratecard::cmd::merge_cmd::main()
}
