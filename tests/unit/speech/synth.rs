use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingEngine {
    inits: AtomicUsize,
    fail_first_inits: usize,
    output: Option<Vec<u8>>,
}

impl CountingEngine {
    fn new(fail_first_inits: usize, output: Option<Vec<u8>>) -> Self {
        Self {
            inits: AtomicUsize::new(0),
            fail_first_inits,
            output,
        }
    }
}

impl SpeechEngine for CountingEngine {
    fn initialize(&self) -> ReelResult<()> {
        let n = self.inits.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(5));
        if n < self.fail_first_inits {
            return Err(ReelError::evaluation("voices not loaded"));
        }
        Ok(())
    }

    fn speak(&self, _text: &str, _settings: &VoiceSettings) -> ReelResult<Option<Vec<u8>>> {
        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn concurrent_callers_initialize_once() {
    let engine = Arc::new(CountingEngine::new(0, Some(vec![1, 2, 3])));
    let synth = NarrationSynthesizer::new(engine.clone());

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                let bytes = synth
                    .synthesize("Hello world.", &VoiceSettings::default())
                    .unwrap();
                assert_eq!(bytes, vec![1, 2, 3]);
            });
        }
    });

    assert_eq!(engine.inits.load(Ordering::SeqCst), 1);
    assert!(synth.is_ready());
}

#[test]
fn failed_init_is_retried_on_next_call() {
    let engine = Arc::new(CountingEngine::new(1, Some(vec![9])));
    let synth = NarrationSynthesizer::new(engine.clone());
    let settings = VoiceSettings::default();

    let err = synth.synthesize("Hi.", &settings).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EngineUnavailable);
    assert!(!synth.is_ready());

    assert_eq!(synth.synthesize("Hi.", &settings).unwrap(), vec![9]);
    assert_eq!(engine.inits.load(Ordering::SeqCst), 2);
}

#[test]
fn missing_or_empty_audio_is_synthesis_failure() {
    let settings = VoiceSettings::default();
    for output in [None, Some(Vec::new())] {
        let synth = NarrationSynthesizer::new(Arc::new(CountingEngine::new(0, output)));
        let err = synth.synthesize("Hi.", &settings).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SynthesisFailure);
    }
}

#[test]
fn shared_espeak_is_one_gate_per_binary() {
    let dir = std::env::temp_dir();
    let a = NarrationSynthesizer::shared_espeak(Path::new("/nonexistent/espeak-a"), &dir);
    let b = NarrationSynthesizer::shared_espeak(Path::new("/nonexistent/espeak-a"), &dir);
    let c = NarrationSynthesizer::shared_espeak(Path::new("/nonexistent/espeak-c"), &dir);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
}
