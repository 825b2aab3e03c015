use vdm_core::logging;

mod cli;
mod driver;
mod term;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init_logging();

    if let Err(err) = cli::run_from_args().await {
        eprintln!("vdm error: {:#}", err);
        std::process::exit(1);
    }
}
