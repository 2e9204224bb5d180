use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use globdict::api::DictApi;
use globdict::config::DictConfig;
use globdict::error::{DictError, Result};
use globdict::script::{Outcome, Script, Step};
use globdict::store::DictRegistry;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "GLOBDICT_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_dir = resolve_config_dir(&cli)?;
    let config = effective_config(&cli, &config_dir)?;

    match cli.command {
        Commands::Run { file } => handle_run(&config, file),
        Commands::Config { save } => handle_config(&config, &config_dir, save),
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("globdict=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.config_dir {
        return Ok(dir.clone());
    }
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "globdict", "globdict")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| DictError::Config("Could not determine config dir".into()))
}

fn effective_config(cli: &Cli, config_dir: &Path) -> Result<DictConfig> {
    let mut config = DictConfig::load(config_dir)?;
    if let Some(max) = cli.max_global_size {
        config = config.with_max_global_size(max);
    }
    if let Some(policy) = cli.id_policy {
        config = config.with_id_policy(policy);
    }
    Ok(config)
}

fn handle_run(config: &DictConfig, file: Option<PathBuf>) -> Result<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let script = Script::parse(&text)?;
    let mut api = DictApi::from_config(config);
    script.run_with(&mut api, print_step)?;
    Ok(())
}

fn handle_config(config: &DictConfig, config_dir: &Path, save: bool) -> Result<()> {
    let api = DictApi::from_config(config);
    println!("max-global-size = {}", api.max_global_size());
    println!("id-policy = {}", api.registry().id_policy());
    if save {
        config.save(config_dir)?;
        println!(
            "{}",
            format!("Config saved to {}", config_dir.display()).green()
        );
    }
    Ok(())
}

fn print_step(step: &Step) {
    let rendered = match &step.outcome {
        Outcome::Handle(h) => h.to_string().yellow().to_string(),
        Outcome::Size(n) => n.to_string(),
        Outcome::Found(Some(value)) => value.clone(),
        Outcome::Found(None) => "NULL".dimmed().to_string(),
        Outcome::Done => return,
    };
    match &step.binding {
        Some(name) => println!("{} = {}", name.bold(), rendered),
        None => println!("{}", rendered),
    }
}
