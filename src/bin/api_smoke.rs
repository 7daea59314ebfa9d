use pos_inspect::api::PosApi;
use pos_inspect::service::smoke_test;
use pos_inspect::{Config, InspectError, logging};
use std::io::Write;
use std::process::ExitCode;
use tracing::info;

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
    let status = match PosApi::new(&cfg.api) {
        Ok(api) => match smoke_test::run(&api, &mut out).await {
            Ok(report) => {
                info!(trd_id = %report.purchase.trd_id, "smoke test passed");
                ExitCode::SUCCESS
            }
            Err(e) => {
                let _ = e.write_diagnostic(&mut out);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            let _ = e.write_diagnostic(&mut out);
            ExitCode::FAILURE
        }
    };
    let _ = out.flush();
    status
}
