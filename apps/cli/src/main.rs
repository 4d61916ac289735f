use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    execute_ticket, load_settings, presentation::ResultView, BadgeTone, HttpScoringClient,
    SubmissionController,
};
use shared::domain::{Metal, CONCENTRATION_UNIT};

/// Submit heavy-metal concentrations (mg) to the HMPI scoring service and
/// print the pollution indices.
#[derive(Parser, Debug)]
#[command(name = "hmpi")]
struct Args {
    /// Base URL of the scoring service (overrides hmpi.toml and environment).
    #[arg(long)]
    scoring_url: Option<String>,
    /// Config file to read instead of ./hmpi.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the raw response body instead of the formatted table.
    #[arg(long)]
    json: bool,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    arsenic: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    lead: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    cadmium: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    chromium: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    mercury: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    nickel: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    copper: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    zinc: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    iron: Option<String>,
    #[arg(long, value_name = "MG", allow_hyphen_values = true)]
    manganese: Option<String>,
    /// Extra readings as `metal=value`, applied after the flags.
    #[arg(value_name = "METAL=MG", value_parser = parse_reading)]
    readings: Vec<(Metal, String)>,
}

impl Args {
    fn reading(&self, metal: Metal) -> Option<&str> {
        let value = match metal {
            Metal::Arsenic => &self.arsenic,
            Metal::Lead => &self.lead,
            Metal::Cadmium => &self.cadmium,
            Metal::Chromium => &self.chromium,
            Metal::Mercury => &self.mercury,
            Metal::Nickel => &self.nickel,
            Metal::Copper => &self.copper,
            Metal::Zinc => &self.zinc,
            Metal::Iron => &self.iron,
            Metal::Manganese => &self.manganese,
        };
        value.as_deref()
    }

    /// Flag readings in form order, then positional readings as given.
    fn edits(&self) -> Vec<(Metal, &str)> {
        Metal::ALL
            .into_iter()
            .filter_map(|metal| self.reading(metal).map(|raw| (metal, raw)))
            .chain(
                self.readings
                    .iter()
                    .map(|(metal, raw)| (*metal, raw.as_str())),
            )
            .collect()
    }
}

fn parse_reading(s: &str) -> Result<(Metal, String), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected METAL=VALUE, got '{s}'"))?;
    let metal = name.parse::<Metal>().map_err(|err| err.to_string())?;
    Ok((metal, raw.to_string()))
}

fn render_result(view: &ResultView) -> String {
    let mut out = String::from("Results:\n");
    for row in &view.rows {
        out.push_str(&format!("  {:<16}{}\n", format!("{}:", row.label), row.value));
    }
    let marker = match view.classification.tone {
        BadgeTone::Safe => "",
        BadgeTone::Alert => " (!)",
    };
    out.push_str(&format!(
        "  {:<16}{}{marker}\n",
        "Classification:", view.classification.label
    ));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Calculated,
    NoResult,
    Rejected,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Calculated => ExitCode::SUCCESS,
            RunStatus::NoResult => ExitCode::FAILURE,
            RunStatus::Rejected => ExitCode::from(2),
        }
    }
}

async fn run(args: &Args, out: &mut impl Write) -> Result<RunStatus> {
    let settings = load_settings(args.config.as_deref())
        .context("failed to load client settings")?
        .with_scoring_url(args.scoring_url.clone());
    let endpoint = settings
        .calculate_endpoint()
        .context("invalid scoring service url")?;
    let client = HttpScoringClient::new(endpoint);
    tracing::info!(endpoint = %client.endpoint(), "using scoring service");

    let mut controller = SubmissionController::new();
    for (metal, raw) in args.edits() {
        if let Err(err) = controller.edit(metal, raw) {
            eprintln!("{}: {err} (got {raw:?} {CONCENTRATION_UNIT})", metal.label());
        }
    }

    let ticket = match controller.submit() {
        Ok(ticket) => ticket,
        Err(rejected) => {
            eprintln!("{rejected}");
            return Ok(RunStatus::Rejected);
        }
    };

    let outcome = execute_ticket(&client, &ticket).await;
    if controller.settle(ticket.id, outcome).is_none() {
        eprintln!("No result received from the scoring service.");
        return Ok(RunStatus::NoResult);
    }

    let Some(report) = controller.result() else {
        return Ok(RunStatus::NoResult);
    };
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(report.as_value())?)?;
    } else {
        write!(out, "{}", render_result(&ResultView::from_report(report)))?;
    }
    Ok(RunStatus::Calculated)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let status = run(&args, &mut std::io::stdout().lock()).await?;
    Ok(status.into())
}
