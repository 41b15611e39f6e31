use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::{bind_address, GuiBridge};
use gui_bridge::model::VisualizationModel;
use retentioncore::prelude::ScenarioParams;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{ModelKind, ScheduleSource, WorkflowConfig, DEFAULT_PHASES};
use workflow::runner::Runner;

mod gui_bridge;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Learner retention incentive simulator")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long)]
    initial_learners: Option<u64>,
    #[arg(long)]
    duration_months: Option<usize>,
    #[arg(long)]
    intervention_month: Option<usize>,
    #[arg(long)]
    revenue_per_learner_month: Option<f64>,
    #[arg(long)]
    incentive_cost_per_learner: Option<f64>,
    /// Whether redeemed learners are kept to the end of the program
    #[arg(long)]
    redeemers_stay_full: Option<bool>,
    /// Drop-off rates (%) for the generated three-phase schedule
    #[arg(long)]
    organic_drop_pre: Option<f64>,
    #[arg(long)]
    major_drop: Option<f64>,
    #[arg(long)]
    organic_drop_post: Option<f64>,
    /// Read the monthly schedule from a `Month,Drop-off Rate` CSV instead
    #[arg(long)]
    schedule_csv: Option<PathBuf>,
    /// Offer the incentive in every month with a positive drop-off rate
    #[arg(long, default_value_t = false)]
    recurring: bool,
    /// NAME:EFFECTIVENESS:REDEEM_RATE, replaces the configured scenarios
    #[arg(long = "scenario", value_parser = parse_scenario)]
    scenarios: Vec<ScenarioParams>,
    /// Print the full result as JSON instead of tables
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Append the executive summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep serving results over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
}

impl Args {
    fn workflow_config(&self) -> anyhow::Result<WorkflowConfig> {
        let mut config = match &self.workflow {
            Some(path) => WorkflowConfig::load(path)?,
            None => WorkflowConfig::default(),
        };

        if let Some(value) = self.initial_learners {
            config.initial_learners = value;
        }
        if let Some(value) = self.duration_months {
            config.duration_months = value;
        }
        if let Some(value) = self.intervention_month {
            config.intervention_month = value;
        }
        if let Some(value) = self.revenue_per_learner_month {
            config.revenue_per_learner_month = value;
        }
        if let Some(value) = self.incentive_cost_per_learner {
            config.incentive_cost_per_learner = value;
        }
        if let Some(value) = self.redeemers_stay_full {
            config.redeemers_stay_full = value;
        }

        if let Some(path) = &self.schedule_csv {
            config.schedule = ScheduleSource::Csv { path: path.clone() };
        } else if self.organic_drop_pre.is_some()
            || self.major_drop.is_some()
            || self.organic_drop_post.is_some()
        {
            let mut phases = match config.schedule {
                ScheduleSource::Phases(phases) => phases,
                _ => DEFAULT_PHASES,
            };
            if let Some(value) = self.organic_drop_pre {
                phases.organic_drop_pre = value;
            }
            if let Some(value) = self.major_drop {
                phases.major_drop = value;
            }
            if let Some(value) = self.organic_drop_post {
                phases.organic_drop_post = value;
            }
            config.schedule = ScheduleSource::Phases(phases);
        }

        if self.recurring {
            config.model = ModelKind::Recurring;
        }
        if !self.scenarios.is_empty() {
            config.scenarios = self.scenarios.clone();
        }
        Ok(config)
    }
}

fn parse_scenario(raw: &str) -> Result<ScenarioParams, String> {
    let mut parts = raw.rsplitn(3, ':');
    let redeem = parts.next();
    let effectiveness = parts.next();
    let name = parts.next();
    match (name, effectiveness, redeem) {
        (Some(name), Some(effectiveness), Some(redeem)) if !name.is_empty() => {
            let effectiveness = effectiveness
                .trim()
                .parse::<f64>()
                .map_err(|err| format!("effectiveness {:?}: {}", effectiveness, err))?;
            let redeem = redeem
                .trim()
                .parse::<f64>()
                .map_err(|err| format!("redeem rate {:?}: {}", redeem, err))?;
            let scenario = ScenarioParams::new(name.trim(), effectiveness, redeem);
            scenario.validate().map_err(|err| err.to_string())?;
            Ok(scenario)
        }
        _ => Err(format!(
            "expected NAME:EFFECTIVENESS:REDEEM_RATE, got {:?}",
            raw
        )),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = args.workflow_config()?;
    let runner = Arc::new(Runner::new());
    let result = runner
        .execute(&workflow_config)
        .context("running retention workflow")?;

    let summary = report::format::executive_summary(&result);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Executive Summary ({})\n{}", result.model, summary);
        if let Some(message) = report::format::recommendation_message(&result) {
            println!("{}\n", message);
        }
        println!(
            "Learner Retention Over Time\n{}",
            report::format::retention_table(&result)
        );
        for issue in &result.data_issues {
            println!("note: {}", issue);
        }
    }

    if let Some(report_path) = &args.report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(summary.as_bytes())?;
    }

    if args.serve {
        let gui_bridge = GuiBridge::new();
        gui_bridge.publish(VisualizationModel::from(&result));
        gui_bridge.serve(runner.clone(), bind_address(args.port));
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        let counts = runner.metrics();
        log::info!(
            "session: {} scenarios simulated, {} configs rejected, {} rows repaired",
            counts.scenarios_simulated,
            counts.configs_rejected,
            counts.rows_repaired
        );
    }

    Ok(())
}
