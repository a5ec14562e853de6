use anyhow::Context;
use smartohm_chat::{
    api::AnswerClient, chat_view::ChatView, config::Config, logging::init_logging, ui::run_ui,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;
    let _logger = init_logging(&config).context("failed to start logging")?;

    let client = AnswerClient::new(config.base_url()?);
    log::info!("answer service at {}", client.base_url());

    run_ui(ChatView::new(client)).await?;
    log::info!("session ended");
    Ok(())
}
