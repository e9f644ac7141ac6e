use std::process::ExitCode;

fn main() -> ExitCode {
    mealwise_cli::run()
}
