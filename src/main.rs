use signup::{app, config::AppConfig, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("signup=debug,axum=info,tower_http=info");

    let config = AppConfig::from_env()?;
    let state = AppState::init(&config).await?;
    let app = app::build_app(state);

    app::serve(app, config.bind_addr()?).await
}
