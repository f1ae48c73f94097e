//! Preset-driven generation.
//!
//! [`GenerationOrchestrator`] is the only place the synthesis engine is
//! invoked. [`BatchRunner`] and [`ComparisonReporter`] drive it strictly
//! sequentially and rely on it turning engine failures into data.

mod batch;
mod compare;
mod naming;
mod orchestrator;
mod types;

pub use batch::{BatchReport, BatchRunner, BatchSummary};
pub use compare::{ComparisonReport, ComparisonReporter, RankedEntry, rank};
pub use naming::{batch_output, comparison_output, generation_output, slug};
pub use orchestrator::GenerationOrchestrator;
pub use types::{GenerationError, GenerationJob, GenerationResult, Outcome, SynthesisFailure};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Waveform;
    use crate::backend::{BackendError, MockBackend};
    use crate::device::Device;
    use crate::preset::{Preset, PresetRegistry};
    use crate::voice::{VoiceProfile, VoiceProfileStore};
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    fn setup() -> (TempDir, VoiceProfileStore, VoiceProfile) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("processed");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("clip1.wav"), b"RIFF one").unwrap();
        std::fs::write(source.join("clip2.wav"), b"RIFF two").unwrap();

        let store = VoiceProfileStore::with_root(temp_dir.path().join("voices"));
        let profile = store.materialize("alex", &source).unwrap();
        (temp_dir, store, profile)
    }

    fn waveform() -> Waveform {
        Waveform::new(vec![0.25; 2400], 24_000)
    }

    fn preset(id: &str) -> &'static Preset {
        PresetRegistry::new().get(id).unwrap()
    }

    fn out_dir(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join("out")
    }

    // ===========================================
    // Naming
    // ===========================================

    #[test]
    fn test_slug_filters_and_truncates() {
        assert_eq!(slug("Hello, world! How are you?", 25), "Hello_world_How_are_you");
        assert_eq!(slug("  padded text  ", 30), "padded_text");
        assert_eq!(slug("abcdefghijklmnopqrstuvwxyz", 5), "abcde");
        assert_eq!(slug("!!!", 10), "");
    }

    #[test]
    fn test_output_names() {
        let dir = Path::new("out");
        assert_eq!(
            generation_output(dir, "Hello world!", "fast"),
            PathBuf::from("out/improved_Hello_world_fast.wav")
        );
        assert_eq!(
            batch_output(dir, 7, "Short test."),
            PathBuf::from("out/007_Short_test.wav")
        );
        assert_eq!(
            comparison_output(dir, "standard"),
            PathBuf::from("out/comparison_standard.wav")
        );
    }

    // ===========================================
    // GenerationOrchestrator
    // ===========================================

    #[test]
    fn test_run_success_writes_artifact() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize()
            .withf(|req| {
                req.text == "Hello world"
                    && req.reference_samples.len() == 2
                    && req.reference_samples[0].file_name == "clip1.wav"
                    && req.device == Device::Cpu
                    && req.parameters.num_autoregressive_samples == 128
                    && req.seed == Some(7)
            })
            .times(1)
            .returning(|_| Ok(waveform()));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let job = GenerationJob::new("Hello world", preset("custom_optimized"), &profile)
            .with_seed(Some(7));

        let result = orchestrator.run(&job, Device::Cpu).unwrap();

        assert!(result.is_success());
        let expected = out_dir(&temp_dir).join("improved_Hello_world_custom_optimized.wav");
        assert_eq!(result.output(), Some(expected.as_path()));
        assert!(expected.exists());
        assert_eq!(result.preset, "custom_optimized");
        assert_eq!(result.voice, "alex");
    }

    #[test]
    fn test_run_uses_explicit_output() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().times(1).returning(|_| Ok(waveform()));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let target = temp_dir.path().join("custom.wav");
        let job = GenerationJob::new("Hi", preset("fast"), &profile).with_output(&target);

        let result = orchestrator.run(&job, Device::Cuda).unwrap();

        assert_eq!(result.output(), Some(target.as_path()));
        assert!(target.exists());
    }

    #[test]
    fn test_run_engine_failure_is_data() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize()
            .times(1)
            .returning(|_| Err(BackendError::BackendError("out of memory".to_string())));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let job = GenerationJob::new("Hello", preset("standard"), &profile);

        let result = orchestrator.run(&job, Device::Cpu).unwrap();

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert!(result.diagnostic().unwrap().contains("out of memory"));
        assert!(!out_dir(&temp_dir).exists());
    }

    #[test]
    fn test_run_invalid_profile_skips_engine() {
        let (temp_dir, store, profile) = setup();
        std::fs::remove_dir_all(&profile.directory).unwrap();

        let mut mock = MockBackend::new();
        mock.expect_synthesize().never();

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let job = GenerationJob::new("Hello", preset("fast"), &profile);

        let result = orchestrator.run(&job, Device::Cpu);

        assert!(matches!(result, Err(GenerationError::InvalidProfile(ref name)) if name == "alex"));
    }

    #[test]
    fn test_run_empty_text_skips_engine() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().never();

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let job = GenerationJob::new("   ", preset("fast"), &profile);

        assert!(matches!(
            orchestrator.run(&job, Device::Cpu),
            Err(GenerationError::EmptyText)
        ));
    }

    #[test]
    fn test_run_empty_waveform_fails_without_artifact() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize()
            .times(1)
            .returning(|_| Ok(Waveform::new(vec![], 24_000)));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let job = GenerationJob::new("Hello", preset("fast"), &profile);

        let result = orchestrator.run(&job, Device::Cpu).unwrap();

        assert!(!result.is_success());
        assert!(!generation_output(&out_dir(&temp_dir), "Hello", "fast").exists());
    }

    // ===========================================
    // BatchRunner
    // ===========================================

    #[test]
    fn test_batch_continues_past_failure() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().times(5).returning(|req| {
            if req.text == "job 2" {
                Err(BackendError::BackendError("engine crashed".to_string()))
            } else {
                Ok(waveform())
            }
        });

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let jobs: Vec<_> = (0..5)
            .map(|i| {
                let text = format!("job {i}");
                let output = batch_output(&out_dir(&temp_dir), i + 1, &text);
                GenerationJob::new(text, preset("ultra_fast"), &profile).with_output(output)
            })
            .collect();

        let report = BatchRunner::new(&orchestrator).run_batch(&jobs, Device::Cpu);

        let flags: Vec<_> = report.results.iter().map(|r| r.is_success()).collect();
        assert_eq!(flags, vec![true, true, false, true, true]);
        let texts: Vec<_> = report.results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["job 0", "job 1", "job 2", "job 3", "job 4"]);
        assert_eq!(report.summary.total, 5);
        assert_eq!(report.summary.succeeded, 4);
        assert_eq!(report.summary.failed, 1);
        assert!(!report.all_succeeded());
        assert_eq!(
            report.results[2].diagnostic(),
            Some("Engine failure: Backend error: engine crashed")
        );
    }

    #[test]
    fn test_batch_records_precondition_failures() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().times(1).returning(|_| Ok(waveform()));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let jobs = vec![
            GenerationJob::new("", preset("fast"), &profile),
            GenerationJob::new("real text", preset("fast"), &profile),
        ];

        let report = BatchRunner::new(&orchestrator).run_batch(&jobs, Device::Cpu);

        assert_eq!(report.results.len(), 2);
        assert!(!report.results[0].is_success());
        assert_eq!(report.results[0].elapsed, Duration::ZERO);
        assert!(report.results[1].is_success());
    }

    #[test]
    fn test_batch_empty() {
        let (temp_dir, store, _profile) = setup();
        let mock = MockBackend::new();
        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));

        let report = BatchRunner::new(&orchestrator).run_batch(&[], Device::Cpu);

        assert!(report.results.is_empty());
        assert_eq!(report.summary.average(), Duration::ZERO);
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_batch_report_serializes() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().times(1).returning(|_| Ok(waveform()));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let jobs = vec![GenerationJob::new("Hello", preset("fast"), &profile)];
        let report = BatchRunner::new(&orchestrator).run_batch(&jobs, Device::Mps);

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["device"], "mps");
        assert_eq!(json["summary"]["succeeded"], 1);
        assert_eq!(json["results"][0]["status"], "succeeded");
        assert_eq!(json["results"][0]["preset"], "fast");
        assert!(json["results"][0]["elapsed_secs"].is_f64());
    }

    // ===========================================
    // ComparisonReporter
    // ===========================================

    #[test]
    fn test_compare_one_entry_per_preset_despite_failure() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().times(3).returning(|req| {
            if req.parameters.diffusion_iterations == 30 {
                Err(BackendError::BackendError("fast preset broke".to_string()))
            } else {
                Ok(waveform())
            }
        });

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let registry = PresetRegistry::new();
        let presets = registry.select(&["standard", "fast", "ultra_fast"]).unwrap();
        let reporter = ComparisonReporter::new(&orchestrator, out_dir(&temp_dir));

        let report = reporter.compare("Compare me", &profile, &presets, Device::Cpu, None);

        let ids: Vec<_> = report.entries.iter().map(|e| e.preset).collect();
        assert_eq!(ids, vec!["ultra_fast", "fast", "standard"]);
        assert_eq!(report.entries.iter().filter(|e| e.is_success()).count(), 2);
        assert!(!report.entries[1].is_success());

        assert_eq!(report.ranking.len(), 2);
        assert!(report.ranking.iter().all(|r| r.preset != "fast"));
        assert!(report.ranking.windows(2).all(|w| w[0].elapsed <= w[1].elapsed));
        assert!(
            out_dir(&temp_dir)
                .join("comparison_ultra_fast.wav")
                .exists()
        );
        assert!(!report.all_succeeded());
    }

    #[test]
    fn test_compare_reorders_into_registry_order() {
        let (temp_dir, store, profile) = setup();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().times(2).returning(|_| Ok(waveform()));

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let presets = vec![preset("high_quality"), preset("ultra_fast")];

        let report = ComparisonReporter::new(&orchestrator, out_dir(&temp_dir)).compare(
            "Hi",
            &profile,
            &presets,
            Device::Cpu,
            None,
        );

        let ids: Vec<_> = report.entries.iter().map(|e| e.preset).collect();
        assert_eq!(ids, vec!["ultra_fast", "high_quality"]);
        assert!(report.all_succeeded());
    }

    #[test]
    fn test_compare_invalid_profile_yields_failed_entries() {
        let (temp_dir, store, profile) = setup();
        std::fs::remove_dir_all(&profile.directory).unwrap();
        let mut mock = MockBackend::new();
        mock.expect_synthesize().never();

        let orchestrator = GenerationOrchestrator::new(&mock, &store, out_dir(&temp_dir));
        let registry = PresetRegistry::new();
        let presets: Vec<_> = registry.list().iter().collect();

        let report = ComparisonReporter::new(&orchestrator, out_dir(&temp_dir)).compare(
            "Hi",
            &profile,
            &presets,
            Device::Cpu,
            None,
        );

        assert_eq!(report.entries.len(), 5);
        assert!(report.entries.iter().all(|e| !e.is_success()));
        assert!(report.ranking.is_empty());
    }

    fn timed(preset_id: &'static str, secs: u64, success: bool) -> GenerationResult {
        let outcome = if success {
            Outcome::Succeeded {
                output: PathBuf::from(format!("{preset_id}.wav")),
            }
        } else {
            Outcome::Failed {
                diagnostic: "boom".to_string(),
            }
        };
        GenerationResult {
            text: "t".to_string(),
            preset: preset_id,
            voice: "alex".to_string(),
            outcome,
            elapsed: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_rank_orders_by_elapsed_then_registry() {
        let entries = vec![
            timed("ultra_fast", 9, true),
            timed("fast", 3, true),
            timed("custom_optimized", 1, false),
            timed("standard", 3, true),
            timed("high_quality", 2, true),
        ];

        let ranking = rank(&entries);

        let ids: Vec<_> = ranking.iter().map(|r| r.preset).collect();
        assert_eq!(ids, vec!["high_quality", "fast", "standard", "ultra_fast"]);
        assert_eq!(ranking[0].quality_score, 9);
    }
}
