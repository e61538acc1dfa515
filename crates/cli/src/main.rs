use anima::commands::{Cli, Shell};
use anima::Config;
use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "anima", "anima") {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config/default.toml")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(&get_config_path());

    let mut shell = Shell::new(&config)?;
    shell.run(cli.command).await
}
