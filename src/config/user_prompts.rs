//! Prompts used when no configuration file exists yet

use crate::error::AppError;
use tokio::io::{self, AsyncBufReadExt};

/// Asks for a Riot API key on stdin and returns the trimmed input.
///
/// # Example
/// ```no_run
/// use match_history::config::user_prompts::prompt_for_api_key;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api_key = prompt_for_api_key().await?;
/// println!("Got a key of {} characters", api_key.len());
/// # Ok(())
/// # }
/// ```
pub async fn prompt_for_api_key() -> Result<String, AppError> {
    println!("Please enter your Riot API key (https://developer.riotgames.com): ");
    let mut input = String::new();
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin);
    reader.read_line(&mut input).await?;
    Ok(input.trim().to_string())
}
