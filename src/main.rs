use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::error;

use anchor_watch::api::plugin::AnchorAlarmPlugin;
use anchor_watch::bus::MemoryBus;
use anchor_watch::logging::init_logging;
use anchor_watch::replay::{run_replay, ReplayScript};
use anchor_watch::utils::config::AppConfig;

fn cli() -> Command {
    Command::new("anchor-watch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Headless anchor alarm")
        .long_about(
            "Watches the distance from the bow to the dropped anchor and raises an alarm\n\
             when the vessel swings outside the allowed radius.",
        )
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("JSON configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise the log level (-v: debug, -vv: trace)"),
        )
        .subcommand(
            Command::new("replay")
                .about("Replay recorded bus updates and print every published delta")
                .arg(
                    Arg::new("file")
                        .value_name("FILE")
                        .required(true)
                        .help("Replay file with initial values and update steps"),
                ),
        )
        .subcommand(Command::new("schema").about("Print the plugin settings schema"))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    let _guard = init_logging(&config.logging, matches.get_count("verbose"))?;

    run_command(&matches, config)
}

fn run_command(matches: &ArgMatches, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("replay", sub)) => {
            let path = sub
                .get_one::<String>("file")
                .ok_or("missing replay file")?;
            let script = ReplayScript::from_file(path)?;
            for delta in run_replay(&script, config.plugin) {
                println!("{}", delta.to_json()?);
            }
        }
        Some(("schema", _)) => {
            let schema = AnchorAlarmPlugin::<MemoryBus>::schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Some((name, _)) => return Err(format!("unknown subcommand '{}'", name).into()),
        None => return Err("no subcommand given".into()),
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
