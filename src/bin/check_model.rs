//! Load the model bundle and report what the server would serve with.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use flight_delay::classifier::load_model;

#[derive(Parser, Debug)]
#[command(name = "check-model", about = "Verify that the flight delay model bundle loads")]
struct Cli {
    /// Path to the model bundle
    #[arg(long, env = "MODEL_PATH", default_value = "model/flight_delay_model.json")]
    model: PathBuf,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    println!("Testing model loading...");
    match load_model(&cli.model) {
        Ok(model) => {
            println!("✓ Model loaded successfully");
            println!("✓ Model type: {}", model.classifier().kind());
            println!("✓ Expected columns: {:?}", model.columns().names());
            println!("\nAll checks passed! Ready to run the API.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Error: {e}");
            ExitCode::FAILURE
        }
    }
}
