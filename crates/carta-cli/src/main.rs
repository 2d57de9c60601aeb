use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use carta::acquire::normalize_url;
use carta::types::{AcquireMethod, FetchResult};
use carta::utils::MenuStats;
use carta::{ExtractOptions, PageAcquirer, extract_menu, presets};

#[derive(Parser)]
#[command(name = "carta")]
#[command(about = "Fetch a restaurant webpage and extract its menu", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and print the menu extracted from it
    Fetch {
        #[arg(help = "URL of the restaurant page (scheme optional)")]
        url: String,

        #[arg(
            long,
            help = "Render the page in a headless browser before extraction"
        )]
        render: bool,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,

        #[arg(
            long,
            value_name = "SYMBOLS",
            default_value = "£$",
            help = "Currency symbols accepted when scanning for prices"
        )]
        currency: String,

        #[arg(
            long,
            help = "Maximum number of items to return",
            value_parser = clap::value_parser!(u16).range(1..)
        )]
        limit: Option<u16>,
    },
    /// Print the built-in preset menus
    Presets {
        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Fetch {
            url,
            render,
            format,
            currency,
            limit,
        } => {
            let mut options = ExtractOptions {
                currencies: currency.chars().collect(),
                ..ExtractOptions::default()
            };
            if let Some(limit) = limit {
                options.max_items = usize::from(limit);
            }
            let options = options.validate().unwrap_or_else(|e| {
                log::error!("Invalid args: {e}");
                process::exit(1);
            });

            let acquirer = PageAcquirer::new().unwrap_or_else(|e| {
                log::error!("Error creating page acquirer: {}", e);
                process::exit(1);
            });

            let html = if render {
                acquirer.fetch_rendered(&url).await
            } else {
                acquirer.fetch_page(&url).await
            }
            .unwrap_or_else(|e| {
                log::error!("Error fetching page: {}", e);
                process::exit(1);
            });

            let items = extract_menu(&html, &options);
            let method = if render {
                AcquireMethod::Browser
            } else {
                AcquireMethod::Http
            };

            match format {
                OutputFormat::Json => {
                    serialize_json(&FetchResult::new(items, normalize_url(&url), method))
                }
                OutputFormat::Text => {
                    if items.is_empty() {
                        println!("No menu items found.");
                    } else {
                        for (i, item) in items.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, item);
                        }
                        print!("{}", MenuStats::from_items(&items));
                    }
                }
            }
        }

        Commands::Presets { format } => {
            let menus = presets::preset_menus();
            match format {
                OutputFormat::Json => serialize_json(&menus),
                OutputFormat::Text => {
                    for menu in &menus {
                        println!("{}", menu.restaurant);
                        for item in &menu.items {
                            println!("  {}", item);
                        }
                        println!();
                    }
                }
            }
        }
    }
}
