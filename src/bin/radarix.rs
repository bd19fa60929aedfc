//! radarix - command-line dashboard for the Radarix vital-sign monitor.
//!
//! ```text
//! radarix login admin@gpp.com --password 123456
//! radarix report -o report.html --svg-dir charts/
//! radarix stats
//! radarix sensor run --profile back
//! radarix describe samples.csv -f Heart_clean
//! ```

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use radarix::client::{CredentialsClient, EdaClient, SensorClient};
use radarix::config::Config;
use radarix::model::{RecordTable, SensorProfile};
use radarix::notify::{Notifier, TerminalNotifier};
use radarix::output::{TerminalEncoder, TerminalMode};
use radarix::session::{Authenticator, FileSessionStore, SessionStore, SignupForm};
use radarix::stats::{describe, histogram, BoxStats, DEFAULT_SAMPLE_BINS};
use radarix::views::{RunSensorPanel, StatisticsView};
use radarix::Error;

/// Radarix - non-contact vital-sign dashboard
#[derive(Parser, Debug)]
#[command(name = "radarix")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "RADARIX_CONFIG")]
    config: Option<PathBuf>,

    /// Session file path
    #[arg(long, global = true, env = "RADARIX_SESSION")]
    session: Option<PathBuf>,

    /// EDA backend base URL
    #[arg(long, global = true)]
    eda_url: Option<String>,

    /// Sensor backend base URL
    #[arg(long, global = true)]
    sensor_url: Option<String>,

    /// Pipeline backend base URL
    #[arg(long, global = true)]
    pipeline_url: Option<String>,

    /// Credential backend base URL
    #[arg(long, global = true)]
    auth_url: Option<String>,

    /// Plain ASCII terminal output
    #[arg(long, global = true)]
    ascii: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the statistics page as an HTML report
    Report {
        /// HTML output file
        #[arg(short, long, default_value = "radarix-report.html")]
        output: PathBuf,

        /// Also write one SVG per chart into this directory
        #[arg(long)]
        svg_dir: Option<PathBuf>,

        /// Also write every chart payload as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Show the statistics page in the terminal
    Stats {
        /// Bar width in characters
        #[arg(long, default_value_t = 40)]
        width: usize,
    },

    /// Control the sensor and the model pipeline
    Sensor {
        #[command(subcommand)]
        action: SensorAction,
    },

    /// Log in with an existing account
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(long, env = "RADARIX_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Signup {
        /// Account email
        email: String,

        /// Password, at least 6 characters
        #[arg(long, env = "RADARIX_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password again
        #[arg(long)]
        confirm: String,
    },

    /// Forget the logged-in user
    Logout,

    /// Print the logged-in user
    Whoami,

    /// Describe the numeric columns of a local sample or run CSV
    Describe {
        /// CSV file
        file: PathBuf,

        /// Columns to describe (default: every column with data)
        #[arg(short, long)]
        feature: Vec<String>,

        /// Histogram bucket count
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BINS)]
        bins: usize,
    },
}

#[derive(Subcommand, Debug)]
enum SensorAction {
    /// Check that the sensor backend is ready
    Status,

    /// Capture one run
    Run {
        /// Chirp profile: front (0) or back (1)
        #[arg(short, long, default_value = "front")]
        profile: SensorProfile,
    },

    /// Upload a recording to the pipeline backend
    Upload {
        /// Recording file
        file: PathBuf,
    },

    /// Run the model pipeline over the uploaded recording
    Pipeline,

    /// Upload a recording for direct heart-rate scoring
    UploadData {
        /// Recording file
        file: PathBuf,
    },
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default_path().map_or_else(Config::default, Config::load_or_default),
    }
    .with_env();

    for (flag, slot) in [
        (&cli.eda_url, &mut config.backends.eda),
        (&cli.sensor_url, &mut config.backends.sensor),
        (&cli.pipeline_url, &mut config.backends.pipeline),
        (&cli.auth_url, &mut config.backends.auth),
    ] {
        if let Some(url) = flag {
            slot.clone_from(url);
        }
    }
    config.validate()?;
    Ok(config)
}

fn session_store(cli: &Cli) -> Result<FileSessionStore> {
    cli.session
        .clone()
        .map(FileSessionStore::new)
        .or_else(FileSessionStore::default_location)
        .context("no data directory on this platform; pass --session")
}

fn encoder(cli: &Cli) -> TerminalEncoder {
    let mode = if cli.ascii {
        TerminalMode::Ascii
    } else {
        TerminalMode::Unicode
    };
    TerminalEncoder::new().mode(mode)
}

fn notifier(cli: &Cli) -> TerminalNotifier<std::io::Stderr> {
    TerminalNotifier::stderr().color(!cli.ascii && std::io::stderr().is_terminal())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let config = load_config(cli)?;
    tracing::debug!(?config, "configuration loaded");

    match &cli.command {
        Commands::Report {
            output,
            svg_dir,
            json,
        } => {
            report(cli, &config, output, svg_dir.as_deref(), json.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Stats { width } => {
            let session = session_store(cli)?.load();
            let eda = EdaClient::from_config(&config)?;
            let page = StatisticsView::new(&eda, &session)?
                .settings(config.report.clone())
                .load()
                .await;
            print!("{}", page.render_terminal(&encoder(cli).width(*width)));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sensor { action } => sensor(cli, &config, action).await,
        Commands::Login { email, password } => {
            let store = session_store(cli)?;
            let mut session = store.load();
            let auth = Authenticator::new(CredentialsClient::from_config(&config)?);
            auth.login(&mut session, email, password).await?;
            store.save(&session)?;
            println!("Logged in as {}", email.trim());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Signup {
            email,
            password,
            confirm,
        } => {
            let auth = Authenticator::new(CredentialsClient::from_config(&config)?);
            let form = SignupForm {
                email: email.clone(),
                password: password.clone(),
                confirm: confirm.clone(),
            };
            auth.signup(&form).await?;
            println!("Account created. You can now log in.");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Logout => {
            let store = session_store(cli)?;
            let mut session = store.load();
            session.logout();
            store.save(&session)?;
            println!("Logged out");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Whoami => {
            match session_store(cli)?.load().email {
                Some(email) => println!("{email}"),
                None => println!("Not logged in"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Describe {
            file,
            feature,
            bins,
        } => {
            describe_file(&encoder(cli), file, feature, *bins)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn report(
    cli: &Cli,
    config: &Config,
    output: &Path,
    svg_dir: Option<&Path>,
    json: Option<&Path>,
) -> Result<()> {
    let session = session_store(cli)?.load();
    let eda = EdaClient::from_config(config)?;
    let view = StatisticsView::new(&eda, &session)?.settings(config.report.clone());
    let page = view.load().await;

    let notifier = notifier(cli);
    for notice in &page.notices {
        notifier.notify(notice);
    }

    page.html_report()
        .write_to_file(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {}", output.display());

    if let Some(dir) = svg_dir {
        let written = page.write_svgs(dir)?;
        println!("Wrote {} charts to {}", written.len(), dir.display());
    }
    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&page.chart_json())?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

async fn sensor(cli: &Cli, config: &Config, action: &SensorAction) -> Result<ExitCode> {
    let session = session_store(cli)?.load();
    let client = SensorClient::from_config(config)?;
    let notifier = notifier(cli);
    let mut panel = RunSensorPanel::new(&client, &session)?.notifier(&notifier);

    let ok = match action {
        SensorAction::Status => panel.check_status().await,
        SensorAction::Run { profile } => panel.run(*profile).await,
        SensorAction::Upload { file } => panel.upload(file).await,
        SensorAction::Pipeline => panel.run_pipeline().await,
        SensorAction::UploadData { file } => panel.upload_data(file).await,
    };
    print!("{}", panel.render_terminal(&encoder(cli)));
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn describe_file(
    enc: &TerminalEncoder,
    file: &Path,
    features: &[String],
    bins: usize,
) -> Result<()> {
    let table =
        RecordTable::from_path(file).with_context(|| format!("reading {}", file.display()))?;

    let columns: Vec<(String, Vec<Option<f64>>)> = if features.is_empty() {
        table
            .columns()
            .into_iter()
            .filter(|(_, values)| values.iter().any(Option::is_some))
            .map(|(name, values)| (name.to_string(), values))
            .collect()
    } else {
        features
            .iter()
            .map(|name| {
                table
                    .column(name)
                    .map(|values| (name.clone(), values))
                    .ok_or_else(|| Error::UnknownFeature(name.clone()))
            })
            .collect::<radarix::Result<_>>()?
    };

    println!("{} {} in {}\n", table.len(), table.kind(), file.display());
    let rows: Vec<(&str, _)> = columns
        .iter()
        .map(|(name, values)| (name.as_str(), describe(values.iter().copied())))
        .collect();
    println!("{}", enc.stats_table(&rows));

    for (name, values) in &columns {
        let hist = histogram(values.iter().copied(), bins);
        println!("{}", enc.histogram(name, hist.is_renderable().then_some(&hist)));
        let stats = BoxStats::from_data(values.iter().copied());
        println!("{}", enc.boxplot(name, stats.as_ref()));
    }
    Ok(())
}
