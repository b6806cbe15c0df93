//! ReachLED: status LED command-line entry point.
//!
//! ```text
//! reachled                                  list colors
//! reachled <color>                          pulse <color> forever (1 s)
//! reachled --pattern red,blue,off           run a pattern until killed
//!          [--delay <secs>] [--hold|--pulse]
//! reachled --config <file.json> ...         override board defaults
//! ```
#![deny(unused_must_use)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use log::{error, info};

use reachled::color::ColorTable;
use reachled::config::LedConfig;
use reachled::drivers::hw_init::open_sysfs_led;
use reachled::drivers::led_patterns::{Pattern, PatternRunner, RenderMode};
use reachled::drivers::renderer::FULL_POWER;
use reachled::error::Error;

/// Delay used by the single-color pulse command.
const PULSE_DELAY: Duration = Duration::from_secs(1);

/// How often the pattern command checks that its worker is still alive.
const WATCH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, PartialEq)]
enum Command {
    List,
    Pulse(String),
    Pattern {
        pattern: String,
        delay: Option<Duration>,
        mode: RenderMode,
    },
}

#[derive(Debug, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    command: Command,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut config = None;
    let mut color = None;
    let mut pattern = None;
    let mut delay = None;
    let mut mode = RenderMode::Hold;

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(it.next().context("--config needs a path")?));
            }
            "--pattern" => pattern = Some(it.next().context("--pattern needs a value")?),
            "--delay" => {
                let raw = it.next().context("--delay needs seconds")?;
                let secs: f64 = raw.parse().with_context(|| format!("bad --delay '{raw}'"))?;
                let d = Duration::try_from_secs_f64(secs)
                    .map_err(|e| anyhow!("bad --delay '{raw}': {e}"))?;
                delay = Some(d);
            }
            "--hold" => mode = RenderMode::Hold,
            "--pulse" => mode = RenderMode::Pulse,
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
            name => {
                if color.is_some() {
                    bail!("unexpected argument '{name}'");
                }
                color = Some(name.to_owned());
            }
        }
    }

    let command = match (pattern, color) {
        (Some(_), Some(c)) => bail!("give either a color or --pattern, not both (got '{c}')"),
        (Some(pattern), None) => Command::Pattern {
            pattern,
            delay,
            mode,
        },
        (None, Some(c)) => Command::Pulse(c),
        (None, None) => Command::List,
    };
    Ok(Args { config, command })
}

fn load_config(path: Option<&PathBuf>) -> Result<LedConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            LedConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => LedConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn color_list(table: &ColorTable) -> String {
    table.names().collect::<Vec<_>>().join(", ")
}

/// Parse `pattern` and check every name against `colors`.
fn check_pattern(pattern: &str, colors: &ColorTable) -> reachled::error::Result<()> {
    Pattern::parse(pattern)?.validate(colors)
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_ref())?;
    let colors = config.color_table()?;

    match args.command {
        Command::List => {
            println!("You need to specify a color");
            println!("List of colors:");
            println!("{}", color_list(&colors));
            Ok(ExitCode::SUCCESS)
        }
        Command::Pulse(color) => {
            if !colors.contains(&color) {
                eprintln!("Can't set color '{color}'. Add it to extra_colors in the config.");
                eprintln!("List of colors: {}", color_list(&colors));
                return Ok(ExitCode::FAILURE);
            }
            let led = open_sysfs_led(&config)?;
            info!("pulsing {color}");
            loop {
                led.pulse(&color, PULSE_DELAY, FULL_POWER)?;
                thread::sleep(PULSE_DELAY);
            }
        }
        Command::Pattern {
            pattern,
            delay,
            mode,
        } => {
            match check_pattern(&pattern, &colors) {
                Ok(()) => {}
                Err(e @ (Error::UnknownColor(_) | Error::InvalidPattern(_))) => {
                    eprintln!("Can't run pattern '{pattern}': {e}");
                    eprintln!("List of colors: {}", color_list(&colors));
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
            let led = Arc::new(open_sysfs_led(&config)?);
            let mut runner = PatternRunner::new(led);
            runner.start(&pattern, delay.unwrap_or(config.default_delay()), mode)?;
            while runner.is_running() {
                thread::sleep(WATCH_INTERVAL);
            }
            runner.stop().context("pattern worker stopped")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
