use clap::Parser;

use meal_finder::config::Config;

// Entry point of the app
#[tokio::main]
async fn main() {
    let config = Config::parse();
    // If serve() returns an error, log and exit
    if let Err(err) = meal_finder::serve(config).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
