//! Subcommand handlers. Each returns the process exit code: 0 on success or
//! a valid result, 1 on failure or an invalid result.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::commands::{
    CheckArgs, GenerateArgs, ServeArgs, StatusArgs, SummaryArgs, TakeoffArgs, TemplatesArgs,
};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::SowgenConfig;
use crate::progress::LoggingHandler;
use crate::store::{store_from_config, DisconnectedStore};
use crate::summary::SowSummary;
use crate::takeoff::TakeoffData;
use crate::template::{list_templates, select_template, validate_compatibility};
use crate::validation::TakeoffValidator;
use crate::workflow::WorkflowOrchestrator;

fn exit_code(result: Result<bool>) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read takeoff file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in takeoff file {}", path.display()))
}

fn read_takeoff(path: &Path) -> Result<TakeoffData> {
    TakeoffData::from_value(read_json(path)?)
        .with_context(|| format!("Takeoff file {} has mistyped fields", path.display()))
}

fn emit(output: String) {
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

pub async fn handle_generate(args: &GenerateArgs, format: OutputFormat, config: &SowgenConfig) -> i32 {
    exit_code(run_generate(args, format, config).await)
}

async fn run_generate(args: &GenerateArgs, format: OutputFormat, config: &SowgenConfig) -> Result<bool> {
    let raw = read_json(&args.file)?;
    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    debug!(data_dir = %data_dir.display(), "Using data directory");

    let orchestrator = WorkflowOrchestrator::new(data_dir, store_from_config(config))?
        .with_progress(Arc::new(LoggingHandler));
    let result = orchestrator.process_submission(raw).await;

    emit(OutputFormatter::new(format).format_workflow(&result)?);
    Ok(result.succeeded())
}

pub fn handle_validate(args: &TakeoffArgs, format: OutputFormat) -> i32 {
    exit_code(run_validate(args, format))
}

fn run_validate(args: &TakeoffArgs, format: OutputFormat) -> Result<bool> {
    let raw = read_json(&args.file)?;
    let report = TakeoffValidator::new().validate_value(&raw);
    emit(OutputFormatter::new(format).format_validation(&report)?);
    Ok(report.is_valid)
}

pub fn handle_select(args: &TakeoffArgs, format: OutputFormat) -> i32 {
    exit_code(run_select(args, format))
}

fn run_select(args: &TakeoffArgs, format: OutputFormat) -> Result<bool> {
    let takeoff = TakeoffData::from_value_lenient(&read_json(&args.file)?);
    let selection = select_template(&takeoff);
    emit(OutputFormatter::new(format).format_selection(&selection)?);
    Ok(true)
}

pub fn handle_check(args: &CheckArgs, format: OutputFormat) -> i32 {
    exit_code(run_check(args, format))
}

fn run_check(args: &CheckArgs, format: OutputFormat) -> Result<bool> {
    let takeoff = TakeoffData::from_value_lenient(&read_json(&args.file)?);
    let report = validate_compatibility(&args.template, &takeoff);
    emit(OutputFormatter::new(format).format_compatibility(&args.template, &report)?);
    Ok(report.compatible)
}

pub fn handle_templates(args: &TemplatesArgs, format: OutputFormat) -> i32 {
    exit_code(run_templates(args, format))
}

fn run_templates(args: &TemplatesArgs, format: OutputFormat) -> Result<bool> {
    let templates = list_templates(args.work_type.as_deref(), args.membrane.as_deref());
    emit(OutputFormatter::new(format).format_templates(&templates)?);
    Ok(true)
}

pub fn handle_summary(args: &SummaryArgs, format: OutputFormat) -> i32 {
    exit_code(run_summary(args, format))
}

fn run_summary(args: &SummaryArgs, format: OutputFormat) -> Result<bool> {
    let takeoff = read_takeoff(&args.file)?;
    let selection = select_template(&takeoff);
    let summary = SowSummary::generate(&takeoff, Some(&selection), chrono::Local::now())?;
    let output = OutputFormatter::new(format).format_summary(&summary)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write summary to {}", path.display()))?;
            info!(path = %path.display(), "Summary written");
        }
        None => emit(output),
    }
    Ok(true)
}

pub fn handle_status(args: &StatusArgs, format: OutputFormat, config: &SowgenConfig) -> i32 {
    exit_code(run_status(args, format, config))
}

fn run_status(args: &StatusArgs, format: OutputFormat, config: &SowgenConfig) -> Result<bool> {
    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let orchestrator = WorkflowOrchestrator::new(data_dir, Arc::new(DisconnectedStore))?;

    match orchestrator.workflow_status(&args.workflow_id)? {
        Some(report) => {
            emit(OutputFormatter::new(format).format_status(&report)?);
            Ok(true)
        }
        None => {
            eprintln!("Workflow {} not found", args.workflow_id);
            Ok(false)
        }
    }
}

pub async fn handle_serve(args: &ServeArgs, config: &SowgenConfig) -> i32 {
    let mut config = config.clone();
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }

    exit_code(crate::api::serve(&config).await.map(|_| true))
}
