//! ATS analyzer: resume and job description compatibility scoring

use anyhow::{bail, Context};
use ats_analyzer::cli::{self, Cli, Commands, ConfigAction};
use ats_analyzer::config::OutputFormat;
use ats_analyzer::input::InputManager;
use ats_analyzer::llm::client::GeminiClient;
use ats_analyzer::llm::optimizer::ContentOptimizer;
use ats_analyzer::output::formatter::{save_report_to_file, suggest_filename};
use ats_analyzer::output::ReportGenerator;
use ats_analyzer::processing::normalizer::RawAnalysis;
use ats_analyzer::{AnalysisEngine, AnalysisOptions, Config, ResumeRecord};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            detailed,
            no_ai,
        } => {
            let format = match output {
                Some(name) => cli::parse_output_format(&name).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;
            let interactive = format == OutputFormat::Console;

            let input_manager = InputManager::new();
            let resume_record = input_manager
                .load_resume(&resume)
                .await
                .with_context(|| format!("Failed to load resume {}", resume.display()))?;
            let job_text = input_manager
                .load_job_description(&job)
                .await
                .with_context(|| format!("Failed to load job description {}", job.display()))?;

            let engine = AnalysisEngine::new(&config)?;

            let api_key = if no_ai { None } else { config.ai.api_key_from_env() };
            let ai_active = api_key.is_some() && config.ai.enabled;
            if interactive {
                println!("🚀 ATS compatibility analysis");
                println!("📄 Resume: {}", resume.display());
                println!("💼 Job Description: {}", job.display());
                if no_ai || !config.ai.enabled {
                    println!("⚠️  AI augmentation disabled");
                } else if api_key.is_none() {
                    println!(
                        "💡 Set {} to enable AI insights",
                        config.ai.api_key_env
                    );
                }
            }

            let progress = (ai_active && interactive).then(|| spinner("Requesting AI insights..."));
            let result = engine
                .analyze(&job_text, &resume_record, &AnalysisOptions { api_key })
                .await?;
            if let Some(progress) = progress {
                progress.finish_and_clear();
            }

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed,
                true,
                true,
            );
            let report = generator.generate_report(&result, format)?;
            println!("{}", report);

            if let Some(save) = save {
                // Save files never carry terminal color codes
                let plain = ReportGenerator::with_options(false, detailed, true, true)
                    .generate_report(&result, format)?;
                let target = resolve_save_path(save, format, &resume);
                save_report_to_file(&plain, &target)
                    .with_context(|| format!("Failed to save report to {}", target.display()))?;
                info!("Report saved to {}", target.display());
                if interactive {
                    println!("💾 Report saved to {}", target.display());
                }
            }
        }

        Commands::Keywords { job } => {
            let job_text = InputManager::new()
                .load_job_description(&job)
                .await
                .with_context(|| format!("Failed to load job description {}", job.display()))?;
            let engine = AnalysisEngine::new(&config)?;
            let keywords = engine.extract_keywords(&job_text);

            println!("🔍 {} keywords extracted from {}\n", keywords.len(), job.display());
            for keyword in &keywords {
                let tag = if engine.skill_matcher().is_technical_term(keyword) {
                    " [technical]"
                } else {
                    ""
                };
                println!("  • {}{}", keyword, tag);
            }

            // Against an empty resume every required skill is reported missing
            let requirements = engine
                .skill_matcher()
                .analyze(&job_text, &ResumeRecord::default(), "");
            if !requirements.required_skills.is_empty() {
                println!("\n🧠 Required skills:");
                for skill in &requirements.required_skills {
                    let marker = if requirements.missing_critical_skills.contains(skill) {
                        " (critical)"
                    } else {
                        ""
                    };
                    println!("  • {}{}", skill, marker);
                }
            }
            if !requirements.certifications.required.is_empty() {
                println!(
                    "\n📜 Certifications: {}",
                    requirements.certifications.required.join(", ")
                );
            }
        }

        Commands::Optimize { resume, job } => {
            let Some(api_key) = config.ai.api_key_from_env() else {
                bail!(
                    "Content optimization needs an API key; set {}",
                    config.ai.api_key_env
                );
            };

            let input_manager = InputManager::new();
            let resume_record = input_manager
                .load_resume(&resume)
                .await
                .with_context(|| format!("Failed to load resume {}", resume.display()))?;
            let job_text = input_manager
                .load_job_description(&job)
                .await
                .with_context(|| format!("Failed to load job description {}", job.display()))?;

            let client = GeminiClient::new(&config.ai, api_key)?;
            let optimizer =
                ContentOptimizer::new(client, Duration::from_secs(config.ai.timeout_secs));

            let progress = spinner("Optimizing resume content...");
            let optimized = optimizer.optimize_resume(&resume_record, &job_text).await;
            progress.finish_and_clear();

            println!("✍️  Optimized experience\n");
            for exp in &optimized.experience {
                println!("▓ {} ({})", exp.position, exp.id);
                if exp.original == exp.optimized {
                    println!("  (unchanged)\n");
                } else {
                    println!("  Before: {}", exp.original);
                    println!("  After:  {}\n", exp.optimized);
                }
            }

            if !optimized.suggested_skills.is_empty() {
                println!("🧠 Suggested skills: {}", optimized.suggested_skills.join(", "));
            }
        }

        Commands::Render { result, output } => {
            let format = cli::parse_output_format(&output).map_err(anyhow::Error::msg)?;
            let content = tokio::fs::read_to_string(&result)
                .await
                .with_context(|| format!("Failed to read {}", result.display()))?;
            let raw = RawAnalysis::from_json(&content)
                .with_context(|| format!("{} is not a JSON analysis result", result.display()))?;

            let engine = AnalysisEngine::new(&config)?;
            let analysis = engine.normalize(raw);
            let generator = ReportGenerator::with_options(
                config.output.color_output,
                config.output.detailed,
                true,
                true,
            );
            println!("{}", generator.generate_report(&analysis, format)?);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let rendered =
                    toml::to_string_pretty(&config).context("Failed to render configuration")?;
                println!("{}", rendered);
                let key_state = if config.ai.api_key_from_env().is_some() {
                    "set"
                } else {
                    "not set"
                };
                println!("API key ({}): {}", config.ai.api_key_env, key_state);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut config = config;
                config
                    .set_value(&key, &value)
                    .with_context(|| format!("Failed to set {}", key))?;
                config.save_to(config_path)?;
                println!("✅ {} = {}", key, value);
            }
        },
    }

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// A directory target gets a generated file name
fn resolve_save_path(save: PathBuf, format: OutputFormat, resume: &Path) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        save
    }
}
