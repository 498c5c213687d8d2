#![allow(clippy::multiple_crate_versions)]

use clap::{Arg, ArgAction, Command};

mod commands;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Router configuration file (TOML)")
}

fn cli() -> Command {
    Command::new("orderdesk")
        .version(VERSION)
        .about("OrderDesk - purchase order routing")
        .subcommand(
            Command::new("route")
                .about("Route one extraction result and print the decision")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .help("Extraction result (JSON)")
                        .required(true),
                )
                .arg(
                    Arg::new("roster")
                        .short('r')
                        .long("roster")
                        .value_name("FILE")
                        .help("Team roster (JSON array)")
                        .required(true),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("write-roster")
                        .long("write-roster")
                        .help("Write the updated workload back to the roster file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Route several extraction results against one shared roster")
                .arg(
                    Arg::new("roster")
                        .short('r')
                        .long("roster")
                        .value_name("FILE")
                        .help("Team roster (JSON array)")
                        .required(true),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("write-roster")
                        .long("write-roster")
                        .help("Write the final workload back to the roster file")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("inputs")
                        .value_name("EXTRACTION")
                        .help("Extraction result files (JSON)")
                        .num_args(1..)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Validate and print the effective router configuration")
                .arg(config_arg()),
        )
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("route", sub_matches)) => commands::route::run(sub_matches),
        Some(("batch", sub_matches)) => commands::batch::run(sub_matches).await,
        Some(("config", sub_matches)) => commands::config::run(sub_matches),
        _ => {
            println!("OrderDesk v{}", VERSION);
            println!("Use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
