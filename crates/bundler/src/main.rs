// crates/bundler/src/main.rs
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let mut args = std::env::args_os();
    let program = args
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundler".to_string());

    let Some(root) = args.next().map(PathBuf::from) else {
        eprintln!("usage: {program} <resource-folder> [output-dir]");
        return Ok(ExitCode::FAILURE);
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    bundler::run(&root, &out_dir)
        .with_context(|| format!("failed to bundle '{}'", root.display()))?;
    Ok(ExitCode::SUCCESS)
}
