use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use phasehull::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

struct BarState {
    bar: ProgressBar,
    phase: Option<&'static str>,
    completed_phases: usize,
}

#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        bar.set_draw_target(target);
        bar.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState {
                bar,
                phase: None,
                completed_phases: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            let BarState {
                bar,
                phase,
                completed_phases,
            } = &mut *guard;

            match progress {
                Progress::PhaseStart { name } => {
                    *phase = Some(name);
                    bar.reset();
                    bar.set_length(0);
                    bar.set_style(Self::spinner_style());
                    bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    bar.set_message(name);
                }
                Progress::PhaseFinish => {
                    bar.disable_steady_tick();
                    *completed_phases += 1;
                    let message = match phase.take() {
                        Some(name) => format!("✓ {}", name),
                        None => "✓ Done".to_string(),
                    };
                    bar.finish_with_message(message);
                }
                Progress::TaskStart { total_steps } => {
                    bar.disable_steady_tick();
                    bar.reset();
                    bar.set_length(total_steps);
                    bar.set_position(0);
                    bar.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => {
                    bar.inc(1);
                }
                Progress::TaskFinish => {
                    let length = bar.length().unwrap_or(0);
                    if bar.position() < length {
                        bar.set_position(length);
                    }
                    bar.finish();
                }
                Progress::Message(msg) => {
                    if bar.is_finished() {
                        bar.set_message(msg);
                    } else {
                        bar.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    /// Number of phases that have reported `PhaseFinish` so far.
    pub fn completed_phases(&self) -> usize {
        self.state.lock().map(|s| s.completed_phases).unwrap_or(0)
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
