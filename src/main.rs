use std::process::ExitCode;

fn main() -> ExitCode {
    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    match certchain::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "certchain failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
