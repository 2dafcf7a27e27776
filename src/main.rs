use stagesync::cli::run;
use stagesync::engine::EngineError;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        // Retryable persistence failures exit 2; caller errors exit 1
        let retryable = e
            .downcast_ref::<EngineError>()
            .map(EngineError::is_retryable)
            .unwrap_or(false);

        if retryable {
            eprintln!("Internal error: {}", e);
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                while let Some(err) = source {
                    eprintln!("  {}", err);
                    source = err.source();
                }
            }
            std::process::exit(2);
        } else {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
