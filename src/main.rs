use std::path::Path;

use clap::Parser;
use edgeline::application::pipeline::Stage;
use edgeline::cli::commands::{Cli, Commands};
use edgeline::config::PipelineConfig;
use edgeline::EdgeLine;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let mut config = match PipelineConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(dir) = cli.data_dir {
        config.artifacts.data_dir = dir;
    }

    let edgeline = match EdgeLine::new(config) {
        Ok(edgeline) => edgeline,
        Err(e) => {
            eprintln!("Error initializing edgeline: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(edgeline, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays parseable JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,edgeline=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(edgeline: EdgeLine, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Load { input } => {
            let raw = read_input(&input)?;
            print_json(&edgeline.run_stage(Stage::Load, Some(&raw)).await?)?;
        }
        Commands::Weather => print_json(&edgeline.run_stage(Stage::Weather, None).await?)?,
        Commands::Injuries => print_json(&edgeline.run_stage(Stage::Injuries, None).await?)?,
        Commands::Strength => print_json(&edgeline.run_stage(Stage::Strength, None).await?)?,
        Commands::Classify => print_json(&edgeline.classify()?.summary)?,
        Commands::Report { json } => {
            let report = edgeline.report()?;
            if json {
                print_json(&report)?;
            } else {
                print!("{}", edgeline.render_report(&report));
            }
        }
        Commands::Run { stage, input, json } => {
            let raw = input.as_deref().map(read_input).transpose()?;
            match stage {
                Some(stage) => {
                    let stage: Stage = stage.parse()?;
                    print_json(&edgeline.run_stage(stage, raw.as_ref()).await?)?;
                }
                None => {
                    let raw = raw.ok_or("a full run needs --input")?;
                    let run = edgeline.run_all(&raw).await?;
                    if json {
                        print_json(&run.diagnostics)?;
                    } else {
                        print!("{}", run.diagnostics.render());
                        println!();
                        print!("{}", edgeline.render_report(&run.report));
                    }
                }
            }
        }
    }
    Ok(())
}
