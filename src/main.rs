use tracing_subscriber::EnvFilter;

mod app;
mod cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = cli::parse();
    app::run(cli);
}
