use clap::CommandFactory;
use std::path::Path;
use std::process;

use crate::cli::{Cli, Commands};
use videocut::engine::runner::{RunOptions, run_jobs};
use videocut::engine::{encode_args, ffmpeg_version, ffprobe_version, format_ffmpeg_cmd, hardware};
use videocut::{config, jobfile};

pub fn run(cli: Cli) {
    if let Some(command) = cli.command {
        match command {
            Commands::CheckFfmpeg => handle_check_ffmpeg(),
            Commands::DryRun { config, json } => handle_dry_run(&config, json),
            Commands::Detect { json } => handle_detect(json),
            Commands::InitConfig => handle_init_config(),
        }
        return;
    }

    let Some(config_path) = cli.config else {
        // Exactly one config path is required when no subcommand is given
        let _ = Cli::command().print_help();
        process::exit(2);
    };

    run_config(&config_path);
}

fn load_jobs_or_exit(path: &Path) -> Vec<videocut::engine::VideoJob> {
    let defaults = config::Config::load()
        .map(|c| c.defaults)
        .unwrap_or_default();

    match jobfile::load_jobs(path, &defaults) {
        Ok(jobs) => jobs,
        Err(e) => {
            eprintln!("Error loading configuration: {:#}", e);
            process::exit(1);
        }
    }
}

fn run_config(path: &Path) {
    let jobs = load_jobs_or_exit(path);
    println!("Loaded configuration: {} job(s) to process", jobs.len());

    let summary = run_jobs(&jobs, &RunOptions::default());

    println!(
        "\nFinished: {}/{} jobs succeeded",
        summary.succeeded, summary.total
    );
    if !summary.all_succeeded() {
        process::exit(1);
    }
}

fn handle_check_ffmpeg() {
    match ffmpeg_version() {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
            match ffprobe_version() {
                Ok(probe_version) => {
                    println!("ffprobe found: {}", probe_version);
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn handle_detect(json: bool) {
    let report = hardware::run_probe_report();

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing report: {:#}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("=== hardware encoder probe ===");
    for result in &report.results {
        println!(
            "- {} ({}): {}",
            result.description,
            result.codec,
            if result.available { "available" } else { "not available" }
        );
    }
    println!(
        "selected: {} ({})",
        report.selected.description, report.selected.codec
    );
}

fn handle_dry_run(path: &Path, json: bool) {
    let jobs = load_jobs_or_exit(path);

    if json {
        let entries: Vec<serde_json::Value> = jobs
            .iter()
            .map(|job| {
                let choice = hardware::resolve_encoder(&job.hwaccel);
                serde_json::json!({
                    "name": job.name,
                    "encoder": choice.codec,
                    "argv": encode_args(job, &choice),
                })
            })
            .collect();

        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error serializing commands: {:#}", e);
                process::exit(1);
            }
        }
        return;
    }

    for job in &jobs {
        let choice = hardware::resolve_encoder(&job.hwaccel);
        let args = encode_args(job, &choice);
        println!("# {}", job.name);
        println!("{}", format_ffmpeg_cmd("ffmpeg", &args));
    }
}

fn handle_init_config() {
    if config::Config::exists() {
        match config::Config::load() {
            Ok(cfg) => {
                match config::Config::config_path() {
                    Ok(path) => println!("Config loaded successfully from {}", path.display()),
                    Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
                }
                println!("{:#?}", cfg);
            }
            Err(e) => {
                eprintln!("Config exists but is invalid: {:#}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("No config file found, creating default...");
    let cfg = config::Config::default();
    if let Err(e) = cfg.save() {
        eprintln!("Failed to save default config: {:#}", e);
        process::exit(1);
    }
    match config::Config::config_path() {
        Ok(path) => println!("Default config saved to {}", path.display()),
        Err(e) => println!("Default config saved (path unknown): {:#}", e),
    }
}
