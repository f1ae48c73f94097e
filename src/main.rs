//! preset-tts CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use preset_tts_rs::backend::{Backend, create_backend};
use preset_tts_rs::cli::{Args, Command, VoiceCommand, read_job_file, write_sample_file};
use preset_tts_rs::device::{Device, DeviceSelector};
use preset_tts_rs::generation::{
    BatchReport, BatchRunner, ComparisonReport, ComparisonReporter, GenerationJob,
    GenerationOrchestrator, GenerationResult, batch_output,
};
use preset_tts_rs::preset::{DEFAULT_PRESET, PresetRegistry};
use preset_tts_rs::voice::{VoiceProfile, VoiceProfileStore};

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.verbose)?;

    let store = match &args.cache_dir {
        Some(dir) => VoiceProfileStore::with_root(dir.clone()),
        None => VoiceProfileStore::new(),
    };
    let registry = PresetRegistry::new();

    // Commands that never touch the engine
    match &args.command {
        Command::ListPresets => {
            list_presets(&registry);
            return Ok(ExitCode::SUCCESS);
        }
        Command::CreateSamples { file } => {
            let count = write_sample_file(file)
                .with_context(|| format!("Failed to write sample file: {}", file.display()))?;
            println!("Created sample job file: {}", file.display());
            println!("  Contains {count} texts for batch processing");
            return Ok(ExitCode::SUCCESS);
        }
        Command::Voice(command) => return voice_command(&store, command),
        _ => {}
    }

    let selector = DeviceSelector::new();
    let device = args.device.resolve(&selector);
    println!(
        "Using device: {device} (expected throughput: {})",
        DeviceSelector::expected_class(device)
    );

    let backend = create_backend(&args.host, args.port).context("Failed to create backend client")?;

    match args.command {
        Command::Status => status(&backend, device),
        Command::Generate {
            text,
            preset,
            voice,
            output,
        } => {
            let preset = registry.get(&preset)?;
            let profile = load_profile(&store, &voice)?;
            let orchestrator = GenerationOrchestrator::new(&backend, &store, ".");

            println!("Generating speech with '{}' preset", preset.id);
            println!("  Text: {text}");
            println!("  Voice: {}", profile.name);
            println!("  Settings: {}", preset.use_case);

            let mut job = GenerationJob::new(text, preset, &profile).with_seed(args.seed);
            if let Some(output) = output {
                job = job.with_output(output);
            }

            let result = orchestrator
                .run(&job, device)
                .context("Cannot start generation")?;
            print_result(&result);
            Ok(exit_code(result.is_success()))
        }
        Command::Batch {
            job_file,
            preset,
            voice,
            output_dir,
            report,
        } => {
            let preset = registry.get(&preset)?;
            let profile = load_profile(&store, &voice)?;
            let texts = read_job_file(&job_file)?;

            println!("Generating {} speech samples", texts.len());
            println!("  Output directory: {}", output_dir.display());
            println!("  Preset: {}", preset.id);

            let jobs: Vec<_> = texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| {
                    let output = batch_output(&output_dir, i + 1, &text);
                    GenerationJob::new(text, preset, &profile)
                        .with_output(output)
                        .with_seed(args.seed)
                })
                .collect();

            let orchestrator = GenerationOrchestrator::new(&backend, &store, &output_dir);
            let runner = BatchRunner::new(&orchestrator).with_progress(progress_bar(jobs.len())?);
            let batch = runner.run_batch(&jobs, device);

            print_batch(&batch);
            write_report(&report, &batch)?;
            Ok(exit_code(batch.all_succeeded()))
        }
        Command::Compare {
            text,
            presets,
            voice,
            output_dir,
            report,
        } => {
            let selected = if presets.is_empty() {
                registry.list().iter().collect()
            } else {
                registry.select(&presets)?
            };
            let profile = load_profile(&store, &voice)?;

            let ids: Vec<_> = selected.iter().map(|p| p.id).collect();
            println!("Generating comparison samples for: '{text}'");
            println!("  Presets: {}", ids.join(", "));

            let orchestrator = GenerationOrchestrator::new(&backend, &store, &output_dir);
            let reporter = ComparisonReporter::new(&orchestrator, &output_dir)
                .with_progress(progress_bar(selected.len())?);
            let comparison = reporter.compare(&text, &profile, &selected, device, args.seed);

            print_comparison(&comparison);
            write_report(&report, &comparison)?;
            Ok(exit_code(comparison.all_succeeded()))
        }
        Command::ListPresets | Command::CreateSamples { .. } | Command::Voice(_) => {
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg}\n[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_profile(store: &VoiceProfileStore, name: &str) -> Result<VoiceProfile> {
    store.load(name).with_context(|| {
        format!(
            "Voice '{name}' is not available in {}. Run `preset-tts voice materialize {name} <dir>` first",
            store.root().display()
        )
    })
}

fn list_presets(registry: &PresetRegistry) {
    println!("Available quality presets:");
    println!("{}", "-".repeat(72));
    for preset in registry.list() {
        println!(
            "{:16} │ {} │ {}",
            preset.id,
            preset.quality_bar(),
            preset.use_case
        );
    }
    println!("{}", "-".repeat(72));
    println!("Recommendation: use '{DEFAULT_PRESET}' for the best speed/quality balance");
}

fn voice_command(store: &VoiceProfileStore, command: &VoiceCommand) -> Result<ExitCode> {
    match command {
        VoiceCommand::Materialize { name, source } => {
            let profile = store
                .materialize(name, source)
                .with_context(|| format!("Failed to materialize voice '{name}'"))?;
            println!("Voice materialized: {}", profile.name);
            print_profile(&profile);
        }
        VoiceCommand::Show { name } => {
            let profile = load_profile(store, name)?;
            println!("Voice: {}", profile.name);
            print_profile(&profile);
        }
        VoiceCommand::List => {
            let profiles = store.list().context("Failed to list voices")?;
            if profiles.is_empty() {
                println!("No voices found in {}", store.root().display());
            }
            for profile in profiles {
                println!("  {} ({} clips)", profile.name, profile.samples.len());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_profile(profile: &VoiceProfile) {
    println!("  Directory: {}", profile.directory.display());
    for sample in &profile.samples {
        println!("    {}", sample.display());
    }
}

fn status<B: Backend>(backend: &B, device: Device) -> Result<ExitCode> {
    let health = backend.health().context("Synthesis server is not reachable")?;

    println!("Server status: {}", health.status);
    println!("  Model: {}", health.model);
    println!("  Server device: {}", health.device);
    if let Some(gpu) = health.gpu {
        println!("  GPU: {gpu}");
    }
    if device == Device::Cuda && !health.cuda_available {
        eprintln!("Warning: CUDA selected locally but the server reports no CUDA support");
    }
    Ok(ExitCode::SUCCESS)
}

fn print_result(result: &GenerationResult) {
    let secs = result.elapsed.as_secs_f64();
    match (result.output(), result.diagnostic()) {
        (Some(output), _) => {
            println!("Saved to: {} ({secs:.1}s)", output.display());
        }
        (None, Some(diagnostic)) => {
            eprintln!("Generation failed [{}]: {diagnostic}", result.preset);
        }
        (None, None) => {}
    }
}

fn print_batch(batch: &BatchReport) {
    for (i, result) in batch.results.iter().enumerate() {
        print!("[{}/{}] ", i + 1, batch.summary.total);
        print_result(result);
        if !result.is_success() {
            println!("Failed: {}", result.text);
        }
    }

    println!("Batch complete");
    println!("  Successful: {}/{}", batch.summary.succeeded, batch.summary.total);
    println!("  Total time: {:.1}s", batch.summary.total_elapsed.as_secs_f64());
    println!("  Average per sample: {:.1}s", batch.summary.average().as_secs_f64());
}

fn print_comparison(comparison: &ComparisonReport) {
    println!("{}", "-".repeat(48));
    println!("{:<16} │ {:<8} │ Status", "Preset", "Time (s)");
    println!("{}", "-".repeat(48));
    for entry in &comparison.entries {
        let (time, status) = if entry.is_success() {
            (format!("{:.1}", entry.elapsed.as_secs_f64()), "ok")
        } else {
            ("N/A".to_string(), "failed")
        };
        println!("{:<16} │ {time:<8} │ {status}", entry.preset);
        if let Some(diagnostic) = entry.diagnostic() {
            eprintln!("{}: {diagnostic}", entry.preset);
        }
    }
    println!("{}", "-".repeat(48));

    if !comparison.ranking.is_empty() {
        println!("Fastest to slowest:");
        for (rank, entry) in comparison.ranking.iter().enumerate() {
            println!(
                "  {}. {} ({:.1}s, quality {}/10)",
                rank + 1,
                entry.preset,
                entry.elapsed.as_secs_f64(),
                entry.quality_score
            );
        }
    }
}

fn write_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "Report saved");
    println!("Results saved to: {}", path.display());
    Ok(())
}
