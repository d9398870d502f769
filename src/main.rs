use log::{error, info};

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("docsbot=info,serenity=warn");
    env_logger::Builder::from_env(env).format_timestamp_secs().init();
}

#[tokio::main]
async fn main() -> docsbot::error::Result<()> {
    init_logging();
    info!("docsbot {} starting", env!("CARGO_PKG_VERSION"));

    docsbot::run()
        .await
        .inspect(|_| info!("docsbot stopped"))
        .inspect_err(|e| error!("docsbot stopped with an error: {e}"))
}
