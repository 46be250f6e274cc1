//! ratecard-lookup - thin wrapper around `ratecard::cmd::lookup_cmd`.

fn main() -> std::process::ExitCode {
    ratecard::cmd::lookup_cmd::main()
}
