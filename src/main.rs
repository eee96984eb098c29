use anyhow::Result;
use clap::Parser;
use console::style;
use log::error;
use std::process::ExitCode;
use video_previews::cli::Cli;
use video_previews::config::PreviewSettings;
use video_previews::init;
use video_previews::signal::setup_shutdown_signal;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let settings = PreviewSettings::from_cli(cli)?;
    let shutdown_signal = setup_shutdown_signal()?;

    video_previews::run(&cli.folder, &settings, shutdown_signal)?;
    Ok(())
}
