//! Kodegen Bundler NW - packages NW.js applications into one executable.
//!
//! This binary zips an NW.js project, appends it to the NW.js launcher,
//! embeds the application icon and copies the runtime files next to it.

use kodegen_bundler_nw::cli::{self, OutputManager};
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            // Errors print even when --quiet was given.
            let output = OutputManager::default();
            if output.error(&e.to_string()).is_ok() {
                for suggestion in e.recovery_suggestions() {
                    let _ = output.hint(&suggestion);
                }
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
