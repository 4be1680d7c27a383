use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use matchday_value::config::{Config, OutputFormat};
use matchday_value::feed::json_file::JsonFileFeed;
use matchday_value::feed::types::FixtureInput;
use matchday_value::feed::{FixtureFeed, SimulatedFeed};
use matchday_value::report::render_text;
use matchday_value::{AnalysisError, FixtureAnalyzer, FixtureReport};

const DEFAULT_CONFIG: &str = "config.toml";
const DEFAULT_SEED: u64 = 2024;

const USAGE: &str = "\
usage: matchday-value [OPTIONS] [FIXTURES.json]

Reads fixtures from FIXTURES.json (or stdin) and prints one report per fixture.

options:
  --config PATH    configuration file (default: ./config.toml if present)
  --text           plain-text reports instead of JSON
  --compact        single-line JSON
  --simulate N     analyse N simulated fixtures instead of reading input
  --seed S         seed for --simulate (default: 2024)
  -h, --help       show this help";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    text: bool,
    compact: bool,
    simulate: Option<usize>,
    seed: Option<u64>,
    input: Option<PathBuf>,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut out = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => out.config = Some(PathBuf::from(value_for(&mut args, "--config")?)),
            "--text" => out.text = true,
            "--compact" => out.compact = true,
            "--simulate" => {
                let n = value_for(&mut args, "--simulate")?;
                out.simulate = Some(n.parse().with_context(|| format!("invalid --simulate count: {n}"))?);
            }
            "--seed" => {
                let s = value_for(&mut args, "--seed")?;
                out.seed = Some(s.parse().with_context(|| format!("invalid --seed: {s}"))?);
            }
            "-h" | "--help" => out.help = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n\n{USAGE}"),
            path => {
                if out.input.is_some() {
                    bail!("more than one input file given\n\n{USAGE}");
                }
                out.input = Some(PathBuf::from(path));
            }
        }
    }
    Ok(out)
}

fn value_for(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().with_context(|| format!("{flag} needs a value"))
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load(p),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG)),
        None => Ok(Config::default()),
    }
}

fn read_fixtures(args: &Args) -> Result<Vec<FixtureInput>> {
    if let Some(n) = args.simulate {
        let mut feed = SimulatedFeed::new(n, args.seed.unwrap_or(DEFAULT_SEED));
        return feed.fetch_fixtures();
    }
    match &args.input {
        Some(path) => JsonFileFeed::new(path).fetch_fixtures(),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read fixtures from stdin")?;
            JsonFileFeed::parse(&content)
        }
    }
}

/// One line of batch output: a report, or why the fixture was skipped.
#[derive(Serialize)]
#[serde(untagged)]
enum BatchEntry<'a> {
    Report(&'a FixtureReport),
    Failed { fixture: String, error: String },
}

fn fixture_label(input: &FixtureInput) -> String {
    format!("{} vs {}", input.fixture.home_team.name, input.fixture.away_team.name)
}

fn write_json(
    out: &mut impl Write,
    inputs: &[FixtureInput],
    results: &[Result<FixtureReport, AnalysisError>],
    pretty: bool,
) -> Result<()> {
    let entries: Vec<BatchEntry> = inputs
        .iter()
        .zip(results)
        .map(|(input, result)| match result {
            Ok(report) => BatchEntry::Report(report),
            Err(e) => BatchEntry::Failed {
                fixture: fixture_label(input),
                error: e.to_string(),
            },
        })
        .collect();
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
    } else {
        serde_json::to_writer(&mut *out, &entries)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_text(
    out: &mut impl Write,
    inputs: &[FixtureInput],
    results: &[Result<FixtureReport, AnalysisError>],
) -> Result<()> {
    for (i, (input, result)) in inputs.iter().zip(results).enumerate() {
        if i > 0 {
            writeln!(out, "{}", "=".repeat(60))?;
        }
        match result {
            Ok(report) => write!(out, "{}", render_text(report))?,
            Err(e) => writeln!(out, "{}: not analysed ({e})", fixture_label(input))?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let inputs = read_fixtures(&args)?;
    tracing::info!(fixtures = inputs.len(), "analysing fixtures");

    let analyzer = FixtureAnalyzer::from_config(&config);
    let results = analyzer.analyse_batch(&inputs, config.batch.workers);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let format = if args.text { OutputFormat::Text } else { config.output.format };
    match format {
        OutputFormat::Json => write_json(&mut out, &inputs, &results, config.output.pretty && !args.compact)?,
        OutputFormat::Text => write_text(&mut out, &inputs, &results)?,
    }
    out.flush()?;
    Ok(())
}
