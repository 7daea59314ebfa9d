use pos_inspect::service::content_check;
use pos_inspect::{Config, InspectError, logging};
use std::io::Write;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            let _ = InspectError::from(e).write_diagnostic(&mut std::io::stderr());
            return ExitCode::FAILURE;
        }
    };
    logging::init_tracing(&cfg.loglevel);

    let mut out = std::io::stdout().lock();
    // Database failures are reported, not propagated: the exit status stays 0.
    if let Err(e) = content_check::run(&cfg.database, &mut out).await {
        let _ = e.write_diagnostic(&mut out);
    }
    let _ = out.flush();
    ExitCode::SUCCESS
}
