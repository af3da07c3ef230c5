use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use otchet::config::Config;
use otchet::{assemble, assets, caption, template, ui};
use tracing::error;

#[derive(Parser)]
#[command(version, about = "Собирает отчёт по лабораторной работе из скриншотов и шаблона")]
struct Opts {
    /// Directory with the screenshots and the report template.
    #[clap(default_value = ".")]
    directory: PathBuf,
    #[clap(short, long, env = "OTCHET_CONFIG")]
    config: Option<PathBuf>,
    /// Do not launch an image viewer while collecting captions.
    #[clap(long)]
    no_preview: bool,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parse config from {}", path.display()))
}

fn run(opts: Opts) -> anyhow::Result<PathBuf> {
    let config = load_config(opts.config.as_ref())?;
    config.validate().map_err(|msg| anyhow!("{msg}"))?;

    // Both fatal preconditions are checked before any prompting starts.
    let assets = assets::discover(&opts.directory, config.ordering)?;
    let candidates = template::find_templates(&opts.directory)?;

    let console = ui::Console::new(!opts.no_preview);
    let template = console.choose_template(&candidates)?;
    let metadata = console.collect_metadata(&config)?;
    let figures = caption::collect(&assets, &mut console.captions(&config.caption), &config.caption);

    let output = assemble::assemble(assemble::Assembly {
        directory: &opts.directory,
        template: &template,
        metadata: &metadata,
        figures: &figures,
        config: &config,
    })?;
    Ok(output)
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    match run(opts) {
        Ok(path) => println!("✅ Отчёт сохранён: {}", path.display()),
        Err(e) => {
            error!(?e, "assembly failed");
            eprintln!("❌ {e:#}");
            std::process::exit(1);
        }
    }
}
