use std::path::PathBuf;

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skillpack_cli::commands::{self, SearchOptions};

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let directives = format!(
        "skillpack_doc={level},skillpack_index={level},skillpack_store={level},\
         skillpack_retrieval={level},skillpack_cli={level}"
    );

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::new(directives))
        .init();
}

fn bundle_arg() -> Arg {
    Arg::new("bundle")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Path to the bundle root directory")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn cli() -> Command {
    Command::new("skillpack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Query and validate skill bundles")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("validate")
                .about("Run integrity checks over a bundle")
                .arg(bundle_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("sections")
                .about("List sections and their topics")
                .arg(bundle_arg()),
        )
        .subcommand(
            Command::new("lookup")
                .about("Resolve a topic term to document paths")
                .arg(bundle_arg())
                .arg(
                    Arg::new("term")
                        .required(true)
                        .help("Topic path, slug, or keyword"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Search document text for a query")
                .arg(bundle_arg())
                .arg(Arg::new("query").required(true).help("Free-text query"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of hits"),
                )
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .value_parser(value_parser!(usize))
                        .help("Token budget across returned snippets"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Print one document as raw markdown")
                .arg(bundle_arg())
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("Topic path, like 02-handbook/narrowing"),
                ),
        )
        .subcommand(
            Command::new("fingerprint")
                .about("Print the bundle Merkle root")
                .arg(bundle_arg()),
        )
}

async fn run(matches: &ArgMatches) -> Result<i32> {
    match matches.subcommand() {
        Some(("validate", args)) => {
            let bundle = args.get_one::<PathBuf>("bundle").unwrap();
            let validation = commands::validate(bundle, args.get_flag("json")).await?;
            print!("{}", validation.rendered);
            Ok(if validation.ok { 0 } else { 1 })
        }
        Some(("sections", args)) => {
            let bundle = args.get_one::<PathBuf>("bundle").unwrap();
            print!("{}", commands::sections(bundle).await?);
            Ok(0)
        }
        Some(("lookup", args)) => {
            let bundle = args.get_one::<PathBuf>("bundle").unwrap();
            let term = args.get_one::<String>("term").unwrap();
            print!("{}", commands::lookup(bundle, term).await?);
            Ok(0)
        }
        Some(("search", args)) => {
            let bundle = args.get_one::<PathBuf>("bundle").unwrap();
            let query = args.get_one::<String>("query").unwrap();
            let options = SearchOptions {
                limit: args.get_one::<usize>("limit").copied(),
                budget: args.get_one::<usize>("budget").copied(),
                json: args.get_flag("json"),
            };
            print!("{}", commands::search(bundle, query, options).await?);
            Ok(0)
        }
        Some(("show", args)) => {
            let bundle = args.get_one::<PathBuf>("bundle").unwrap();
            let path = args.get_one::<String>("path").unwrap();
            print!("{}", commands::show(bundle, path).await?);
            Ok(0)
        }
        Some(("fingerprint", args)) => {
            let bundle = args.get_one::<PathBuf>("bundle").unwrap();
            print!("{}", commands::fingerprint(bundle).await?);
            Ok(0)
        }
        _ => Ok(0),
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    match run(&matches).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}
