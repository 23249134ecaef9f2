extern crate chrono;
extern crate env_logger;
extern crate failure;
extern crate ghuls;
#[macro_use]
extern crate log;
extern crate rand;
extern crate sec;
extern crate shellexpand;
extern crate structopt;

use std::env;
use std::io::Write;
use std::path::Path;
use std::process;

use chrono::Local;
use env_logger::Builder;
use failure::{Error, ResultExt};
use ghuls::{random_color, Config, DataSource, Driver, Report, UserId};
use log::LevelFilter;
use sec::Secret;
use structopt::StructOpt;

fn main() {
    let args = Args::from_args();

    if args.example_config {
        if let Err(e) = generate_example() {
            report_error(&e);
            process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&args) {
        report_error(&e);
        process::exit(1);
    }
}

fn report_error(e: &Error) {
    eprintln!("Error: {}", e);

    for cause in e.iter_causes() {
        eprintln!("\tCaused By: {}", cause);
    }
}

fn generate_example() -> Result<(), Error> {
    let example = Config::example();

    println!("{}", example.as_toml()?);
    Ok(())
}

fn run(args: &Args) -> Result<(), Error> {
    initialize_logging(args)?;
    let cfg = args.config()?;

    if log_enabled!(log::Level::Debug) {
        for line in format!("{:#?}", cfg).lines() {
            debug!("{}", line);
        }
    }

    let driver = Driver::with_config(cfg);

    let user = match args.user {
        Some(ref id) => driver.user(&UserId::from(id.as_str()))?,
        None if args.random => driver.random_user(&mut rand::thread_rng())?,
        None => return Err(failure::err_msg("Either provide a user or use --random")),
    };

    let colors = driver
        .source()
        .color_table()
        .context("Unable to get the language colors")?;

    println!("User: {}", user.username);
    println!("Avatar: {}", user.avatar_url);

    println!();
    println!("Languages:");
    match driver.analyze_user(&user.username)? {
        Some(percentages) => print!("{}", Report::new(&percentages, &colors, random_color)),
        None => println!("No data"),
    }

    println!();
    println!("Organizations:");
    match driver.analyze_orgs(&user.username)? {
        Some(percentages) => print!("{}", Report::new(&percentages, &colors, random_color)),
        None => println!("No data"),
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, StructOpt)]
#[structopt(about = "See which languages a GitHub user writes")]
struct Args {
    #[structopt(help = "The user's login or numeric id")]
    user: Option<String>,
    #[structopt(short = "c", long = "config", default_value = "~/.ghuls.toml",
                help = "The configuration file to use.")]
    config_file: String,
    #[structopt(short = "t", long = "token", env = "GITHUB_TOKEN", hide_env_values = true,
                help = "Your GitHub API token (overrides the config file)")]
    token: Option<String>,
    #[structopt(short = "r", long = "random",
                help = "Analyse a random user instead")]
    random: bool,
    #[structopt(short = "v", long = "verbose", parse(from_occurrences),
                help = "Verbose output (repeat for more verbosity)")]
    verbosity: u64,
    #[structopt(long = "example-config",
                help = "Generate an example config and immediately exit.")]
    example_config: bool,
}

impl Args {
    pub fn config(&self) -> Result<Config, Error> {
        let config_file =
            shellexpand::full(&self.config_file).context("Unable to expand wildcards")?;
        let config_file = Path::new(&*config_file);

        let mut cfg = if config_file.exists() {
            Config::from_file(config_file).context("Couldn't load the config")?
        } else {
            debug!("{} doesn't exist, using the defaults", config_file.display());
            Config::default()
        };

        if let Some(ref token) = self.token {
            cfg.github.api_key = Some(Secret::new(token.clone()));
        }

        Ok(cfg)
    }
}

fn initialize_logging(args: &Args) -> Result<(), Error> {
    let mut builder = Builder::new();

    let level = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    builder.filter(Some("ghuls"), level);

    if let Ok(filter) = env::var("RUST_LOG") {
        builder.parse(&filter);
    }

    builder.format(|out, record| match record.line() {
        Some(line) => writeln!(
            out,
            "{} [{:5}] ({}#{}): {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            line,
            record.args()
        ),
        None => writeln!(
            out,
            "{} [{:5}] ({}): {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        ),
    });

    builder.try_init()?;

    Ok(())
}
