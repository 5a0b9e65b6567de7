//! `mocap-switcher`: load and save person mocap on scene files

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mocap_document::{DocumentStore, FileStore};
use mocap_splice::{control_id_of, MocapSwitcher, SceneHost, SpliceReport, SwitcherConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "mocap-switcher.toml";

fn cli() -> Command {
    Command::new("mocap-switcher")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Swap captured person animation between scene files and portable mocap files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (defaults apply when it does not exist)"),
        )
        .arg(
            Arg::new("person")
                .long("person")
                .global(true)
                .help("Atom id of the person to bind to"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(
            Command::new("load")
                .about("Apply a mocap file to the person in a scene file")
                .arg(scene_arg())
                .arg(
                    Arg::new("mocap")
                        .long("mocap")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Mocap file to load"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the resulting scene (default: overwrite --scene)"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export the person's mocap from a scene file")
                .arg(scene_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Mocap file to write (default: <mocap_dir>/<scene name>)"),
                ),
        )
        .subcommand(
            Command::new("control-id")
                .about("Print the control record id paired with an animation record id")
                .arg(Arg::new("animation-id").required(true)),
        )
        .subcommand(
            Command::new("classify")
                .about("List the person's animation records and their controls")
                .arg(scene_arg()),
        )
}

fn scene_arg() -> Arg {
    Arg::new("scene")
        .long("scene")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Scene file")
}

fn init_tracing(verbose: bool, json: bool) {
    let default_directives = if verbose {
        "mocap_switcher=debug,mocap_splice=debug,mocap_document=debug"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<SwitcherConfig> {
    let path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = if path.exists() {
        SwitcherConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        SwitcherConfig::new()
    };

    if let Some(person) = matches.get_one::<String>("person") {
        config = config.with_person_id(person.clone());
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn open_scene(path: &Path, config: &SwitcherConfig) -> Result<SceneHost<FileStore>> {
    let host = SceneHost::open(path)
        .with_context(|| format!("failed to open scene {}", path.display()))?;
    Ok(host.with_core_control_id(config.core_control_id.as_str()))
}

fn default_export_path(config: &SwitcherConfig, scene: &Path) -> PathBuf {
    let name = scene
        .file_stem()
        .map_or_else(|| "mocap".into(), |stem| stem.to_string_lossy());
    config.mocap_path(&name)
}

fn print_report(report: &SpliceReport) {
    println!(
        "removed {} records, added {} records, timing {}",
        report.removed.len(),
        report.added.len(),
        if report.timing_merged { "merged" } else { "kept" }
    );
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("load", args)) => {
            let config = load_config(matches)?;
            let scene_path = args.get_one::<PathBuf>("scene").context("--scene is required")?;
            let mocap_path = args.get_one::<PathBuf>("mocap").context("--mocap is required")?;
            let out = args.get_one::<PathBuf>("out").unwrap_or(scene_path);

            let mut host = open_scene(scene_path, &config)?;
            let switcher = MocapSwitcher::bind(config, &host, FileStore::new())
                .context("failed to bind to person")?;
            let report = switcher
                .load_and_apply(&mut host, mocap_path)
                .with_context(|| format!("failed to load mocap {}", mocap_path.display()))?;

            switcher
                .store()
                .save(out, host.scene().as_value())
                .with_context(|| format!("failed to write scene {}", out.display()))?;
            print_report(&report);
            println!("wrote {}", out.display());
        }
        Some(("export", args)) => {
            let config = load_config(matches)?;
            let scene_path = args.get_one::<PathBuf>("scene").context("--scene is required")?;
            let out = args
                .get_one::<PathBuf>("out")
                .cloned()
                .unwrap_or_else(|| default_export_path(&config, scene_path));

            let mut host = open_scene(scene_path, &config)?;
            let switcher = MocapSwitcher::bind(config, &host, FileStore::new())
                .context("failed to bind to person")?;
            let written = switcher
                .save_mocap(&mut host, &out)
                .with_context(|| format!("failed to export mocap to {}", out.display()))?;
            println!("wrote {}", written.display());
        }
        Some(("control-id", args)) => {
            let animation_id = args
                .get_one::<String>("animation-id")
                .context("animation id is required")?;
            println!("{}", control_id_of(animation_id));
        }
        Some(("classify", args)) => {
            let config = load_config(matches)?;
            let scene_path = args.get_one::<PathBuf>("scene").context("--scene is required")?;
            let host = open_scene(scene_path, &config)?;
            let switcher = MocapSwitcher::bind(config, &host, FileStore::new())
                .context("failed to bind to person")?;
            for pair in switcher.animation_ids() {
                println!("{}\t{}", pair.animation_id(), pair.control_id());
            }
        }
        Some((other, _)) => bail!("unknown subcommand '{other}'"),
        None => bail!("no subcommand given"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"), matches.get_flag("log-json"));
    tracing::debug!("mocap-switcher v{}", env!("CARGO_PKG_VERSION"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
