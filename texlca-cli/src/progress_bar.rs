use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use texlca::progress::{ByteNum, ProgressNotifier};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ProgressUnit {
    Bytes,
    Reads,
}

#[derive(Debug)]
struct ProgressBarState {
    unit: ProgressUnit,
    length: Option<u64>,
    styled: bool,
}

impl ProgressBarState {
    fn style(&self) -> ProgressStyle {
        let template = match (self.unit, self.length) {
            (ProgressUnit::Bytes, None) => "{spinner} {bytes} ({bytes_per_sec}) {msg}",
            (ProgressUnit::Bytes, Some(_)) => "{wide_bar} {bytes}/{total_bytes} [ETA {eta}] {msg}",
            (ProgressUnit::Reads, None) => "{spinner} {pos} reads ({per_sec}) {msg}",
            (ProgressUnit::Reads, Some(_)) => "{wide_bar} {pos}/{len} reads [ETA {eta}] {msg}",
        };
        let style = match self.length {
            Some(_) => ProgressStyle::default_bar(),
            None => ProgressStyle::default_spinner(),
        };

        style.template(template).expect("Invalid progress bar template")
    }
}

/// Spinner/progress bar on the standard error, shared between the commands
/// and the logger.
#[derive(Debug, Clone)]
pub(crate) struct TexlcaProgressBar {
    bar: ProgressBar,
    state: Arc<Mutex<ProgressBarState>>,
}

impl TexlcaProgressBar {
    pub fn new() -> TexlcaProgressBar {
        let bar = ProgressBar::hidden();
        bar.set_style(ProgressStyle::default_spinner());
        bar.enable_steady_tick(Duration::from_millis(50));
        bar.set_message("Initializing...");

        Self {
            bar,
            state: Arc::new(Mutex::new(ProgressBarState {
                unit: ProgressUnit::Bytes,
                length: None,
                styled: false,
            })),
        }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear()
    }

    pub fn set_message(&self, message: &'static str) {
        self.bar.set_message(message);
    }

    /// Switches to counting bytes of an input of given size, if known.
    pub fn set_total_bytes(&self, length: Option<u64>) {
        self.reset(ProgressUnit::Bytes, length);
    }

    fn reset(&self, unit: ProgressUnit, length: Option<u64>) {
        let mut state = self.state.lock().unwrap();
        state.unit = unit;
        state.length = length.filter(|&length| length > 0);
        state.styled = false;
    }

    fn inc(&self, value: u64) {
        {
            let mut state = self.state.lock().unwrap();
            if !state.styled {
                self.bar.set_style(state.style());
                self.bar.set_length(state.length.unwrap_or(0));
                self.bar.set_position(0);
                state.styled = true;
            }
        }

        self.bar.inc(value);
    }

    pub fn println<I: AsRef<str>>(&self, msg: I) {
        self.bar.println(msg);
    }
}

impl ProgressNotifier for TexlcaProgressBar {
    fn processed_bytes(&self, bytes: ByteNum) {
        self.inc(bytes.get() as u64);
    }

    fn set_group_num(&self, group_num: u64) {
        self.reset(ProgressUnit::Reads, Some(group_num));
        self.set_message("Computing consensus...");
    }

    fn inc_group(&self) {
        self.inc(1);
    }
}
