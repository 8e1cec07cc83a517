use ca_utils::path::display_path;
use clap::Parser;
use cli::{Args, Commands};
use logging::setup_logging;
use maintenance::{drop_cache, refresh_plugin_dupes};
use miette::Result;
use nu_ansi_term::Color::Green;
use search::{search_catalog, SearchArgs};
use settings::show_settings;
use state::{absolute_config_path, AppState};
use template::{print_xml, show_template};
use tracing::info;
use utils::{set_color, Colored};

mod cli;
mod logging;
mod maintenance;
mod search;
mod settings;
mod state;
mod template;
mod utils;

fn handle_cli() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    match args.command {
        Commands::DefConfig => {
            let path = match args.config.as_deref() {
                Some(file) => absolute_config_path(file)?,
                None => ca_config::config_path(),
            };
            ca_config::generate_default_config(&path)?;
            info!(
                "{} {}",
                Colored(Green, "Default configuration written to"),
                display_path(&path)
            );
        }
        Commands::Show { file, generic } => show_template(&file, generic)?,
        Commands::MakeXml { file } => print_xml(&file)?,
        command => {
            let state = AppState::new(args.config.as_deref())?;

            match command {
                Commands::Search {
                    query,
                    any,
                    sort_by,
                    sort_dir,
                    page,
                    per_page,
                } => {
                    let search = SearchArgs {
                        query,
                        any,
                        sort_by,
                        sort_dir,
                        page,
                        per_page,
                    };
                    search_catalog(&state, search, args.json)?;
                }
                Commands::Dupes => refresh_plugin_dupes(&state)?,
                Commands::DropCache => drop_cache(&state)?,
                Commands::Settings { write } => show_settings(&state, write, args.json)?,
                Commands::DefConfig | Commands::Show { .. } | Commands::MakeXml { .. } => {}
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}
