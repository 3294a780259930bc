#[path = "reasoning-grader/app.rs"]
mod app;
#[path = "reasoning-grader/args.rs"]
mod args;
#[path = "reasoning-grader/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
