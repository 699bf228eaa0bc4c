use std::fs;
use std::io::{self, IsTerminal, Read};

use clap::{ArgAction, Parser, Subcommand};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use relink_config::{
    CONFIG_KEYS, RelinkConfig, Route, get_config_value, load_config, open_in_editor,
    resolve_base_url, resolve_copy_output, resolve_route, resolve_simple_output,
    set_config_value,
};
use relink_convert::{
    BackendClient, ConversionRequest, Controller, FailureKind, LINUX_CLIPBOARD_HOLD,
    SystemClipboard,
};
use relink_core::{
    ConvertedLink, RelinkError, RelinkResult, classify, detect_platform, encode_for_transport,
    extract_id, validate_url,
};
use tracing::{debug, warn};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show how a link is classified, without contacting the backend
    Inspect { url: String },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Parser)]
#[command(name = "relink")]
#[command(version, about = "Convert a streaming link to another service", long_about = None)]
struct Cli {
    /// Read links from a file, one per line
    #[arg(long)]
    input: Option<String>,
    /// Take the link from the clipboard
    #[arg(long)]
    paste: bool,
    /// Copy the converted link to the clipboard
    #[arg(long)]
    copy: bool,
    /// Print only the converted link
    #[arg(long)]
    simple: bool,
    /// Print results as JSON
    #[arg(long, conflicts_with = "simple")]
    json: bool,
    /// Conversion service address
    #[arg(long)]
    base_url: Option<String>,
    /// Backend route: link or category
    #[arg(long)]
    route: Option<String>,
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
    #[arg(value_name = "URL")]
    urls: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    Simple,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    debug!(?cli, "CLI arguments parsed");

    match &cli.command {
        Some(Commands::Config { action }) => {
            exit_on_error(handle_config_command(action));
            return;
        }
        Some(Commands::Inspect { url }) => {
            inspect(url);
            return;
        }
        None => {}
    }

    let config = load_config().unwrap_or_else(|err| fail(err));
    let settings = Settings::resolve(&cli, &config).unwrap_or_else(|err| fail(err));
    debug!(?settings, "resolved settings");

    let backend = BackendClient::with_base_url(&settings.base_url).unwrap_or_else(|err| fail(err));
    let controller = Controller::new(backend, settings.route);

    let mut clipboard = None;
    if cli.paste {
        let pasted = open_clipboard(&mut clipboard).and_then(|board| controller.paste(board));
        match pasted {
            Ok(text) => debug!(%text, "pasted link"),
            Err(err) => fail(err),
        }
    }

    let urls = gather_inputs(&cli, &controller.state().input).unwrap_or_else(|err| fail(err));
    if urls.is_empty() {
        warn!("no streaming link entered");
        eprintln!("{} no input URLs provided", style("Error:").red());
        std::process::exit(1);
    }

    let mut success = 0usize;
    let mut failed = 0usize;

    for url in &urls {
        match controller.submit(url).await {
            Ok(converted) => {
                success += 1;
                print_result(&converted, settings.output);
                if settings.copy {
                    if cfg!(target_os = "linux") && settings.output == OutputMode::Full {
                        println!(
                            "{} holding the clipboard for up to {}s",
                            style("…").dim(),
                            LINUX_CLIPBOARD_HOLD.as_secs()
                        );
                    }
                    // The Linux write blocks while it serves the selection.
                    let copied = tokio::task::block_in_place(|| {
                        open_clipboard(&mut clipboard).and_then(|board| controller.copy(board))
                    });
                    match copied {
                        Ok(_) if settings.output == OutputMode::Full => {
                            println!("{} Copied to clipboard", style("✓").green());
                        }
                        Ok(_) => {}
                        Err(err) => eprintln!("{} {err}", style("Warning:").yellow()),
                    }
                }
            }
            Err(err) => {
                failed += 1;
                let reason = FailureKind::from_error(&err).describe();
                eprintln!("{} {url}: {reason} ({err})", style("Failed").red());
            }
        }
    }

    if settings.output == OutputMode::Full && urls.len() > 1 {
        print_summary(success + failed, success, failed);
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    // RUST_LOG wins over the flags.
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
struct Settings {
    base_url: String,
    route: Route,
    output: OutputMode,
    copy: bool,
}

impl Settings {
    /// Flags override the environment, which overrides the config file.
    fn resolve(cli: &Cli, config: &RelinkConfig) -> RelinkResult<Self> {
        let base_url = match &cli.base_url {
            Some(base) => {
                validate_url(base)?;
                base.trim_end_matches('/').to_string()
            }
            None => resolve_base_url(config)?,
        };
        let route = match &cli.route {
            Some(route) => route.parse()?,
            None => resolve_route(config)?,
        };
        let output = if cli.json {
            OutputMode::Json
        } else if cli.simple || resolve_simple_output(config) {
            OutputMode::Simple
        } else {
            OutputMode::Full
        };

        Ok(Self {
            base_url,
            route,
            output,
            copy: cli.copy || resolve_copy_output(config),
        })
    }
}

fn open_clipboard(slot: &mut Option<SystemClipboard>) -> RelinkResult<&mut SystemClipboard> {
    if slot.is_none() {
        *slot = Some(SystemClipboard::new()?);
    }
    slot.as_mut()
        .ok_or_else(|| RelinkError::Clipboard("clipboard unavailable".to_string()))
}

fn gather_inputs(cli: &Cli, pasted: &str) -> RelinkResult<Vec<String>> {
    let mut urls = cli.urls.clone();

    if !pasted.trim().is_empty() {
        urls.push(pasted.trim().to_string());
    }

    if let Some(path) = &cli.input {
        let content = fs::read_to_string(path)
            .map_err(|err| RelinkError::InvalidInput(format!("failed to read input file: {err}")))?;
        urls.extend(parse_lines(&content));
    }

    if urls.is_empty() && !cli.paste {
        if io::stdin().is_terminal() {
            let link: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt("Enter link")
                .allow_empty(true)
                .interact_text()
                .map_err(|err| RelinkError::InvalidInput(format!("prompt failed: {err}")))?;
            urls.extend(parse_lines(&link));
        } else {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| RelinkError::InvalidInput(format!("failed to read stdin: {err}")))?;
            urls.extend(parse_lines(&buffer));
        }
    }

    Ok(urls)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

fn inspect(url: &str) {
    let category = classify(url);
    println!("{} {category}", style("Category:").cyan());
    println!("{} {}", style("Platform:").cyan(), detect_platform(url));
    match extract_id(category, url) {
        Ok(id) => println!("{} {id}", style("Identifier:").cyan()),
        Err(err) => println!("{} ({err})", style("Identifier:").red()),
    }
    println!("{} {}", style("Encoded:").cyan(), encode_for_transport(url));

    for route in [Route::Link, Route::Category] {
        match ConversionRequest::build(url, route) {
            Ok(request) => println!("  {} {}", style(format!("{route}:")).dim(), request.path()),
            Err(err) => println!("  {} ({err})", style(format!("{route}:")).dim()),
        }
    }
}

fn handle_config_command(action: &ConfigAction) -> RelinkResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_config_value(&config, key) {
                Some(v) => println!("{key} = {v}"),
                None => println!("{key} = <null>"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(key, value)?;
            println!("{} Set {key} = {value}", style("✓").green());
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            println!("Current configuration:");
            let mut section = "";
            for &key in CONFIG_KEYS {
                let (table, _) = key.split_once('.').unwrap_or(("", key));
                if table != section {
                    println!("\n[{table}]");
                    section = table;
                }
                let name = key.rsplit('.').next().unwrap_or(key);
                let value = get_config_value(&config, key);
                println!("{name} = {}", value.as_deref().unwrap_or("<null>"));
            }
            Ok(())
        }
        ConfigAction::Edit => open_in_editor(),
    }
}

fn print_result(result: &ConvertedLink, output: OutputMode) {
    match output {
        OutputMode::Simple => {
            if let Some(url) = result.best() {
                println!("{url}");
            }
        }
        OutputMode::Json => match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("{} failed to encode result: {err}", style("Error:").red()),
        },
        OutputMode::Full => {
            println!(
                "{} {} {}",
                style("From:").cyan(),
                result.source_platform,
                style(format!("({})", result.category)).dim()
            );
            println!("  {} {}", style("URL:").dim(), result.source_url);
            match result.best() {
                Some(url) => println!("{} {url}", style("To:").green()),
                None => println!("{} (no converted link)", style("To:").red()),
            }
            println!();
        }
    }
}

fn print_summary(total: usize, success: usize, failed: usize) {
    println!(
        "{} Total: {} | Success: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        success,
        failed
    );
}

fn exit_on_error(result: RelinkResult<()>) {
    if let Err(err) = result {
        fail(err);
    }
}

fn fail(err: RelinkError) -> ! {
    eprintln!("{} {err}", style("Error:").red());
    std::process::exit(1);
}
