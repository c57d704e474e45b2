use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use ttlprobe::{
    batch::probe_many,
    driver::InteractiveDriver,
    ConfigOverrides, OutputConfig, OutputFormat, OutputManager, ProbeConfig, TtlProber,
};

fn build_cli() -> Command {
    Command::new("ttlprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Guess a remote host's operating system from the TTL of its ping reply")
        .arg(
            Arg::new("targets")
                .value_name("TARGET")
                .help("Hosts to probe (IP or hostname). Prompts for one when omitted")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("count")
                .short('c')
                .long("count")
                .value_name("N")
                .help("Echo requests per probe")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Reply timeout in seconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file (default: ~/.ttlprobe.toml)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FORMAT")
                .help("Output format")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::new("concurrency")
                .short('j')
                .long("concurrency")
                .value_name("N")
                .help("Probes running at once when several targets are given")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show which rule produced the guess")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-pause")
                .long("no-pause")
                .help("Do not wait for a keypress before exiting interactive mode")
                .action(ArgAction::SetTrue),
        )
}

fn resolve_config(matches: &clap::ArgMatches) -> anyhow::Result<ProbeConfig> {
    let overrides = ConfigOverrides {
        count: matches.get_one::<u32>("count").copied(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        concurrency: matches.get_one::<usize>("concurrency").copied(),
    };
    let config_file = matches.get_one::<PathBuf>("config");

    ProbeConfig::resolve(
        config_file.map(PathBuf::as_path),
        &ProbeConfig::default_path(),
        |key| std::env::var(key).ok(),
        &overrides,
    )
    .with_context(|| match config_file {
        Some(path) => format!("loading {}", path.display()),
        None => "invalid configuration".to_string(),
    })
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let matches = build_cli().get_matches();

    let config = match resolve_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[!] {:#}", e);
            process::exit(1);
        }
    };

    let format = matches
        .get_one::<String>("output")
        .and_then(|f| f.parse::<OutputFormat>().ok())
        .unwrap_or(OutputFormat::Text);
    let output = OutputManager::new(OutputConfig {
        format,
        colored: io::stdout().is_terminal(),
        verbose: matches.get_flag("verbose"),
    });

    let concurrency = config.concurrency;
    let prober = TtlProber::new(config);
    let targets: Vec<String> = matches
        .get_many::<String>("targets")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let result = if targets.is_empty() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut stdout = io::stdout();
        InteractiveDriver::new(&prober, &output)
            .with_pause(!matches.get_flag("no-pause"))
            .run(&mut input, &mut stdout)
            .map(|_| ())
    } else {
        let reports = probe_many(&prober, &targets, concurrency).await;
        output.write_reports(&mut io::stdout(), &reports)
    };

    if let Err(e) = result {
        log::error!("Console I/O failed: {}", e);
    }
}
