use stacklist::cli::{internal_error, run};
use stacklist::error::ListingError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    #[cfg(windows)]
    let _ = enable_ansi_support::enable_ansi_support();

    if let Err(e) = run() {
        // Configuration problems and store failures are internal errors
        let is_internal = match e.downcast_ref::<ListingError>() {
            Some(listing_error) => listing_error.is_configuration(),
            None => e.chain().any(|cause| cause.is::<rusqlite::Error>()),
        };

        if is_internal {
            internal_error(&format!("{:#}", e));
        } else {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
