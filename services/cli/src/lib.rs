mod cli;
mod console;
mod demo;
mod layout;

use parkade::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
