use anyhow::Result;
use grupi::cli::{actions, start};

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = start()?;

    actions::execute(action, &globals).await
}
