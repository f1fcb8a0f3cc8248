mod cli;
mod decide;
mod infra;
mod routes;
mod server;

use card_rules::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
