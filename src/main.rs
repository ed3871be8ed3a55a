//! SignScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use signscribe::cli::{
    app::{
        load_merged_config, run_delete, run_export, run_list, run_record, EXIT_ERROR,
        EXIT_USAGE_ERROR,
    },
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    RecordOptions,
};
use signscribe::domain::capture::Duration;
use signscribe::domain::config::AppConfig;
use signscribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Config management needs no merged config
    let command = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        endpoint: cli.endpoint.clone(),
        library_path: cli.library.clone(),
        device: cli.device.clone(),
        format: cli.format.clone(),
        translate: if cli.translate { Some(true) } else { None },
        max_duration: cli.duration.clone(),
    };

    // Merge: defaults < file < cli (env comes in through the parser)
    let config = load_merged_config(cli_config).await;
    let library = config.library_path.clone();
    let endpoint = config.endpoint_or_default().to_string();

    match command {
        Some(Commands::List) => run_list(library.as_deref()).await,
        Some(Commands::Delete { id, yes }) => {
            run_delete(&id, yes, library.as_deref(), &endpoint).await
        }
        Some(Commands::Export { id, output }) => {
            run_export(&id, &output, library.as_deref(), &endpoint).await
        }
        Some(Commands::Config { .. }) => unreachable!(), // Handled above
        None => {
            // Parse the recording duration
            let duration = match config.max_duration.as_ref() {
                Some(s) => match s.parse::<Duration>() {
                    Ok(d) => d,
                    Err(e) => {
                        presenter.error(&format!("Invalid duration: {}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => Duration::default_max_duration(),
            };

            // An explicit --format must be valid; a config value falls back
            let format = match cli.format.as_deref() {
                Some(s) => match s.parse() {
                    Ok(f) => Some(f),
                    Err(e) => {
                        presenter.error(&format!("{}", e));
                        return ExitCode::from(EXIT_USAGE_ERROR);
                    }
                },
                None => config.format.as_ref().and_then(|s| s.parse().ok()),
            };

            let options = RecordOptions {
                duration,
                name: cli.name,
                translate: config.translate_or_default(),
                format,
                device: config.device_or_default().to_string(),
                library,
                endpoint,
            };

            run_record(options).await
        }
    }
}
