use std::process::ExitCode;

fn main() -> ExitCode {
    visor_cli::run()
}
