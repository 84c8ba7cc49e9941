use cardtable_net::logging::{init_logging_with, LogFormat};

fn main() {
    let format = match std::env::var("CARDTABLE_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Text,
    };
    // A subscriber may already be installed by an embedding harness.
    let _ = init_logging_with(format);
    let code = cardtable_cli::run(
        std::env::args(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    std::process::exit(code);
}
