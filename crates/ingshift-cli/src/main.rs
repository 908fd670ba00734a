//! `ingshift` command line

mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ingshift_core::{ClusterFacts, SynthConfig, Target};
use tracing_subscriber::EnvFilter;

fn target_arg() -> Arg {
    Arg::new("target")
        .long("target")
        .short('t')
        .required(true)
        .help("Target controller: traefik or gateway-api")
}

fn input_arg() -> Arg {
    Arg::new("input")
        .long("input")
        .short('i')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Route snapshot file (JSON or YAML, list or {ingresses: [...]})")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of text")
}

fn cli() -> Command {
    Command::new("ingshift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate ingress-nginx annotations into Traefik or Gateway API manifests")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output; repeat for debug"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Report how each annotation carries over to the target")
                .arg(input_arg())
                .arg(target_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("migrate")
                .about("Generate migration files for the target")
                .arg(input_arg())
                .arg(target_arg())
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .default_value("./migration")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to write generated files"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML synthesizer configuration"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Derive the migration phase from observed cluster facts")
                .arg(
                    Arg::new("facts")
                        .long("facts")
                        .short('f')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with cluster facts"),
                )
                .arg(target_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("explain")
                .about("Show what the knowledge base says about one annotation")
                .arg(Arg::new("key").required(true).help("Annotation key, with or without prefix"))
                .arg(target_arg())
                .arg(json_arg()),
        )
}

fn init_tracing(verbosity: u8, json: bool) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn target(args: &ArgMatches) -> Result<Target> {
    let name = args.get_one::<String>("target").context("missing --target")?;
    Ok(ingshift_core::parse_target(name)?)
}

fn path<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(id)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing --{id}"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn analyze(args: &ArgMatches) -> Result<()> {
    let target = target(args)?;
    let routes = ingshift_core::load_routes(path(args, "input")?)?;
    let report = ingshift_core::analyze(&routes, target);
    if args.get_flag("json") {
        print_json(&report)
    } else {
        print!("{}", output::analysis_text(&report));
        Ok(())
    }
}

fn migrate(args: &ArgMatches) -> Result<()> {
    let target = target(args)?;
    let config = match args.get_one::<PathBuf>("config") {
        Some(file) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            SynthConfig::from_toml(&text).with_context(|| format!("loading {}", file.display()))?
        }
        None => SynthConfig::default(),
    };
    let routes = ingshift_core::load_routes(path(args, "input")?)?;
    let artifacts = ingshift_core::synthesize(&routes, target, &config)?;

    let out = path(args, "output-dir")?;
    output::write_artifacts(out, &artifacts)?;
    tracing::info!("Wrote {} files to {}", artifacts.len(), out.display());

    println!("Generated {} files in {}", artifacts.len(), out.display());
    println!("Start with {}", out.join(ingshift_core::REPORT_PATH).display());
    Ok(())
}

fn validate(args: &ArgMatches) -> Result<()> {
    let target = target(args)?;
    let file = path(args, "facts")?;
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let facts: ClusterFacts =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;
    let report = ingshift_core::derive_validation_phase(&facts, target);
    if args.get_flag("json") {
        print_json(&report)
    } else {
        print!("{}", output::validation_text(&report));
        Ok(())
    }
}

fn explain(args: &ArgMatches) -> Result<()> {
    let target = target(args)?;
    let key = args.get_one::<String>("key").context("missing annotation key")?;
    let explanation = ingshift_core::explain(key, target);
    if args.get_flag("json") {
        print_json(&explanation)
    } else {
        print!("{}", output::explanation_text(&explanation));
        Ok(())
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"), matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("analyze", args)) => analyze(args),
        Some(("migrate", args)) => migrate(args),
        Some(("validate", args)) => validate(args),
        Some(("explain", args)) => explain(args),
        _ => unreachable!("subcommand is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn migrate_defaults_output_dir() {
        let matches = cli()
            .try_get_matches_from(["ingshift", "migrate", "-i", "routes.json", "-t", "traefik"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(path(args, "output-dir").unwrap(), Path::new("./migration"));
        assert_eq!(target(args).unwrap(), Target::Traefik);
    }

    #[test]
    fn unknown_target_is_an_error() {
        let matches = cli()
            .try_get_matches_from(["ingshift", "explain", "ssl-redirect", "--target", "haproxy"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(target(args).unwrap_err().to_string().contains("haproxy"));
    }

    #[test]
    fn verbose_is_global() {
        let matches = cli()
            .try_get_matches_from(["ingshift", "explain", "ssl-redirect", "-t", "traefik", "-vv"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        assert!(!matches.get_flag("log-json"));
    }

    #[test]
    fn log_json_is_global() {
        let matches = cli()
            .try_get_matches_from(["ingshift", "explain", "ssl-redirect", "-t", "traefik", "--log-json"])
            .unwrap();
        assert!(matches.get_flag("log-json"));
    }

    #[test]
    fn migrate_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("routes.json");
        std::fs::write(&input, r#"[{"namespace": "default", "name": "web"}]"#).unwrap();
        let out = dir.path().join("out");
        let input = input.to_str().unwrap();
        let out_arg = out.to_str().unwrap();
        let matches = cli()
            .try_get_matches_from([
                "ingshift", "migrate", "--input", input, "--target", "gateway-api", "--output-dir", out_arg,
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        migrate(args).unwrap();
        assert!(out.join("00-migration-report.md").is_file());
        assert!(out.join("03-gateway/gateway.yaml").is_file());
    }
}
