//! NIDRA CLI - Sleep Score Prediction
//!
//! Collects health and lifestyle inputs, runs the pre-trained regression
//! ensemble, and prints the aggregated sleep score with a category and
//! advice.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nidra::config::{AppConfig, LoggingConfig};
use nidra::features::FeatureAssembler;
use nidra::models::inference::EnsembleEngine;
use nidra::scalers::ScalerBank;
use nidra::types::profile::{BmiCategory, Gender, HealthProfile, SleepDisorder};
use nidra::types::report::SleepReport;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "nidra",
    version,
    about = "Sleep score prediction over a pre-trained regression ensemble",
    long_about = "Encodes health and lifestyle inputs into the feature vector the\n\
        models were trained on, runs every model in the ensemble, and reports\n\
        the aggregated sleep score with a qualitative category.\n\n\
        EXAMPLES:\n\
        \n  nidra predict --gender male --bmi-category normal --sleep-disorder normal \\\n\
             --age 25 --sleep-duration 7.0 --activity 30 --stress 5 \\\n\
             --heart-rate 75 --daily-steps 5000 --systolic-bp 120 --diastolic-bp 80\n\
        \n  nidra predict --input profile.json --json\n\
        \n  gen_profile 20 | nidra predict --input - --batch"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "config/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Predict a sleep score from flags or a JSON profile
    Predict(PredictArgs),
    /// Load all configured artifacts and list the ensemble models
    Models,
}

#[derive(Debug, Args)]
struct PredictArgs {
    /// Read a profile as JSON from a file, or '-' for stdin
    #[arg(long)]
    input: Option<String>,

    /// Treat --input as JSON lines, one profile per line
    #[arg(long, requires = "input")]
    batch: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Include per-model scores in the output
    #[arg(long)]
    show_models: bool,

    #[command(flatten)]
    form: FormArgs,
}

/// The interactive form, as typed CLI flags. Enumerations and value ranges
/// are enforced by the argument parser; JSON input goes through profile
/// validation instead.
#[derive(Debug, Args)]
struct FormArgs {
    /// Gender
    #[arg(long, value_enum, required_unless_present = "input", conflicts_with = "input")]
    gender: Option<Gender>,

    /// BMI category
    #[arg(long, value_enum, required_unless_present = "input", conflicts_with = "input")]
    bmi_category: Option<BmiCategory>,

    /// Sleep disorder diagnosis
    #[arg(long, value_enum, required_unless_present = "input", conflicts_with = "input")]
    sleep_disorder: Option<SleepDisorder>,

    /// Age in years
    #[arg(long, value_parser = clap::value_parser!(u32).range(10..=100),
          required_unless_present = "input", conflicts_with = "input")]
    age: Option<u32>,

    /// Sleep duration in hours per night (0.0-12.0)
    #[arg(long, value_parser = parse_sleep_duration,
          required_unless_present = "input", conflicts_with = "input")]
    sleep_duration: Option<f64>,

    /// Physical activity in minutes per day
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=300),
          required_unless_present = "input", conflicts_with = "input")]
    activity: Option<u32>,

    /// Stress level (1-10)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10),
          required_unless_present = "input", conflicts_with = "input")]
    stress: Option<u32>,

    /// Resting heart rate in bpm
    #[arg(long, value_parser = clap::value_parser!(u32).range(40..=200),
          required_unless_present = "input", conflicts_with = "input")]
    heart_rate: Option<u32>,

    /// Daily step count
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=30000),
          required_unless_present = "input", conflicts_with = "input")]
    daily_steps: Option<u32>,

    /// Systolic blood pressure in mmHg
    #[arg(long, value_parser = clap::value_parser!(u32).range(80..=200),
          required_unless_present = "input", conflicts_with = "input")]
    systolic_bp: Option<u32>,

    /// Diastolic blood pressure in mmHg
    #[arg(long, value_parser = clap::value_parser!(u32).range(50..=120),
          required_unless_present = "input", conflicts_with = "input")]
    diastolic_bp: Option<u32>,
}

fn parse_sleep_duration(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=12.0).contains(&value) {
        return Err(format!("{value} is not in 0.0-12.0"));
    }
    Ok(value)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)?;
    init_logging(&config.logging)?;

    match cli.command {
        Command::Predict(args) => predict(&config, args),
        Command::Models => list_models(&config),
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    // Logs go to stderr so stdout stays clean for report output
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn predict(config: &AppConfig, args: PredictArgs) -> Result<()> {
    // Reject bad input before paying for artifact loading
    let profiles = collect_profiles(&args)?;
    for profile in &profiles {
        profile.validate()?;
    }

    let scalers = ScalerBank::load(&config.artifacts.scaler_path)?;
    let assembler = FeatureAssembler::new(scalers, config.preprocessing.invert_sleep_duration);
    let engine = EnsembleEngine::new(config)?;

    info!(
        models = engine.model_count(),
        features = assembler.feature_count(),
        "Prediction service ready"
    );

    for profile in &profiles {
        let features = assembler.assemble(profile);
        let prediction = engine.predict(&features)?;
        let report = prediction.to_report();

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report, args.show_models);
        }
    }

    Ok(())
}

fn list_models(config: &AppConfig) -> Result<()> {
    let engine = EnsembleEngine::new(config)?;

    println!("Loaded {} models:", engine.model_count());
    for name in engine.model_names() {
        println!("  {name}");
    }

    Ok(())
}

fn collect_profiles(args: &PredictArgs) -> Result<Vec<HealthProfile>> {
    match &args.input {
        Some(source) => {
            let raw = read_input(source)?;
            if args.batch {
                raw.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|line| {
                        serde_json::from_str(line).context("Failed to parse profile line")
                    })
                    .collect()
            } else {
                let profile =
                    serde_json::from_str(&raw).context("Failed to parse profile JSON")?;
                Ok(vec![profile])
            }
        }
        None => Ok(vec![profile_from_form(&args.form)?]),
    }
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read profile from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read profile file {source}"))
    }
}

fn profile_from_form(form: &FormArgs) -> Result<HealthProfile> {
    // clap guarantees these are present when --input is absent
    Ok(HealthProfile {
        gender: form.gender.context("--gender is required")?,
        bmi_category: form.bmi_category.context("--bmi-category is required")?,
        sleep_disorder: form.sleep_disorder.context("--sleep-disorder is required")?,
        age: form.age.context("--age is required")?,
        sleep_duration: form.sleep_duration.context("--sleep-duration is required")?,
        physical_activity: form.activity.context("--activity is required")?,
        stress_level: form.stress.context("--stress is required")?,
        heart_rate: form.heart_rate.context("--heart-rate is required")?,
        daily_steps: form.daily_steps.context("--daily-steps is required")?,
        systolic_bp: form.systolic_bp.context("--systolic-bp is required")?,
        diastolic_bp: form.diastolic_bp.context("--diastolic-bp is required")?,
    })
}

fn print_report(report: &SleepReport, show_models: bool) {
    println!("Sleep Score: {:.2}", report.sleep_score);
    println!("Category:    {}", report.category.label());
    println!("{}", report.advice);

    if show_models {
        println!();
        println!("Per-model scores:");
        let mut scores: Vec<_> = report.model_scores.iter().collect();
        scores.sort_by(|a, b| a.0.cmp(b.0));
        for (name, score) in scores {
            println!("  {name:<18} {score:.2}");
        }
    }
}
