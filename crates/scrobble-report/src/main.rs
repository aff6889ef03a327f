use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scrobble_core::config::ReportConfig;
use scrobble_core::report::{run_report, ListeningReport, PersonReport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare two music listening histories", long_about = None)]
struct Cli {
    /// TOML file with report settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Play-history export for person A
    #[arg(long)]
    person_a: Option<PathBuf>,
    /// Play-history export for person B
    #[arg(long)]
    person_b: Option<PathBuf>,
    /// Directory receiving the joint table and the histogram figure
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ReportConfig::default(),
        };
        if let Some(path) = self.person_a {
            config.person_a.export_path = path;
        }
        if let Some(path) = self.person_b {
            config.person_b.export_path = path;
        }
        if let Some(dir) = self.output_dir {
            config.output.directory = dir;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = Cli::parse().into_config()?;
    let report = run_report(&config).context("listening report failed")?;
    print_report(&report, &config)?;

    info!(
        joint_table = %report.joint_table_path.display(),
        histograms = %report.histogram_path.display(),
        "report written"
    );
    Ok(())
}

fn print_person(person: &PersonReport, config: &ReportConfig) {
    println!(
        ">>> Music listening habits for person {} (head):\n{}\n",
        person.label,
        person.scrobbles.head(config.display.head_rows)
    );
    println!(
        ">>> Music listening habits for person {} (tail):\n{}\n",
        person.label,
        person.scrobbles.tail(config.display.tail_rows)
    );
}

fn print_report(report: &ListeningReport, config: &ReportConfig) -> Result<()> {
    print_person(&report.person_a, config);
    print_person(&report.person_b, config);

    for person in [&report.person_a, &report.person_b] {
        println!(
            ">>> Pivot table for person {}:\n{}\n",
            person.label,
            person.summary.to_dataframe()?
        );
    }

    println!(
        ">>> The joint pivot table looks like this:\n{}\n",
        report.joint.to_dataframe()?
    );
    println!(
        ">>> Melted joint pivot table for the times_listened columns:\n{}\n",
        report.long_form.to_dataframe()?
    );
    println!(
        ">>> Describe the melted joint pivot table using statistics:\n{}",
        report.long_form_stats.to_dataframe("value")?
    );
    Ok(())
}
