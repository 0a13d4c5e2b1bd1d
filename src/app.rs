use crate::config::Theme;
use crate::engine::ReloadOutcome;
use crate::models::{AppState, Mode};
use crate::utils::strings;
use crate::worker::{Reply, Request, Worker};
use rand::prelude::IndexedRandom;
use textwrap::Options;
use tracing::{info, warn};

const STATUS_MESSAGES: &[&str] = &[
    "Your input has been auto-corrected",
    "Your wording has been optimised",
    "The best words were chosen for you",
    "Smart input system running",
    "Potential mistakes detected and fixed",
    "Input enhancement module active",
    "SCP-CN-468-J anomaly in effect",
];

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub mode: Mode,
    pub theme: Theme,
    pub confirm_quit: bool,

    /// Everything produced so far.
    pub output: String,
    /// Token being typed.
    pub input: String,
    pub status: String,
    pub samples: Vec<(String, String)>,
    /// A request is in flight; input is locked until it returns.
    pub pending: bool,
    /// The engine thread died; nothing more will come back from it.
    pub worker_lost: bool,

    pub terminal_width: u16,
    pub visual_lines: Vec<String>,

    worker: Worker,
}

impl App {
    pub fn new(
        mode: Mode,
        worker: Worker,
        samples: Vec<(String, String)>,
        theme: Theme,
        confirm_quit: bool,
    ) -> Self {
        Self {
            should_quit: false,
            state: AppState::Typing,
            mode,
            theme,
            confirm_quit,
            output: String::new(),
            input: String::new(),
            status: "Waiting for input...".to_string(),
            samples,
            pending: false,
            worker_lost: false,
            terminal_width: 80,
            visual_lines: Vec::new(),
            worker,
        }
    }

    pub fn resize(&mut self, width: u16, _height: u16) {
        self.terminal_width = width;
        self.recalculate_lines();
    }

    pub fn on_key(&mut self, c: char) {
        if self.state == AppState::ConfirmQuit {
            match c {
                'y' | 'Y' => self.should_quit = true,
                'n' | 'N' => self.state = AppState::Typing,
                _ => {}
            }
            return;
        }
        if self.pending {
            return;
        }

        if strings::is_token_boundary(c) {
            self.commit();
        } else {
            self.input.push(c);
        }
    }

    /// Pasted text lands in the input field; line breaks become spaces and
    /// nothing is committed until the user does so.
    pub fn on_paste(&mut self, text: &str) {
        if self.state != AppState::Typing || self.pending {
            return;
        }
        self.input.push_str(&strings::flatten_lines(text));
    }

    /// In the quit dialog Enter picks the default answer, which is "no".
    pub fn on_enter(&mut self) {
        match self.state {
            AppState::ConfirmQuit => self.state = AppState::Typing,
            AppState::Typing => {
                if !self.pending {
                    self.commit();
                }
            }
        }
    }

    pub fn on_backspace(&mut self) {
        if self.state == AppState::Typing && !self.pending {
            self.input.pop();
        }
    }

    /// Esc / Ctrl+Q. Asks first unless confirmation is turned off.
    pub fn request_quit(&mut self) {
        match self.state {
            AppState::ConfirmQuit => self.state = AppState::Typing,
            AppState::Typing if self.confirm_quit => self.state = AppState::ConfirmQuit,
            AppState::Typing => self.should_quit = true,
        }
    }

    pub fn clear(&mut self) {
        if self.state != AppState::Typing {
            return;
        }
        self.output.clear();
        self.status = "Text cleared".to_string();
        self.recalculate_lines();
    }

    pub fn reload(&mut self) {
        if self.state != AppState::Typing || self.pending {
            return;
        }
        if self.dispatch(Request::Reload) {
            self.status = "Reloading word map...".to_string();
        }
    }

    /// Drains finished work from the engine thread. Called once per tick.
    pub fn poll_worker(&mut self) {
        if self.worker_lost {
            return;
        }
        loop {
            match self.worker.try_recv() {
                Ok(Some(reply)) => {
                    self.pending = false;
                    match reply {
                        Reply::Corrupted(text) => self.on_corrupted(&text),
                        Reply::Reloaded { outcome, samples } => self.on_reloaded(outcome, samples),
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("{}", e);
                    self.lose_worker();
                    break;
                }
            }
        }
    }

    fn commit(&mut self) {
        let token = self.input.trim().to_string();
        self.input.clear();
        if token.is_empty() {
            return;
        }
        if self.dispatch(Request::Corrupt(token)) {
            self.status = "Processing...".to_string();
        }
    }

    fn dispatch(&mut self, request: Request) -> bool {
        if !self.worker_lost && self.worker.send(request) {
            self.pending = true;
            return true;
        }
        if !self.worker_lost {
            warn!("substitution worker is not running");
        }
        self.lose_worker();
        false
    }

    fn lose_worker(&mut self) {
        self.worker_lost = true;
        self.pending = false;
        self.status = "Input engine unavailable".to_string();
    }

    fn on_corrupted(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push(' ');
        let mut rng = rand::rng();
        let message = STATUS_MESSAGES.choose(&mut rng).copied().unwrap_or("Ready");
        self.status = message.to_string();
        self.recalculate_lines();
    }

    fn on_reloaded(&mut self, outcome: ReloadOutcome, samples: Vec<(String, String)>) {
        match outcome {
            ReloadOutcome::Reloaded { entries } => {
                info!(entries, "word map reloaded");
                self.status = format!("Word map reloaded ({} entries)", entries);
                self.samples = samples;
            }
            ReloadOutcome::NotApplicable => {
                self.status = "Generative mode has no word map to reload".to_string();
            }
        }
    }

    pub fn sample_text(&self) -> String {
        match self.mode {
            Mode::Generative => "Samples: generative mode active".to_string(),
            Mode::Dictionary if self.samples.is_empty() => "Samples: no mapped words".to_string(),
            Mode::Dictionary => {
                let pairs: Vec<String> = self
                    .samples
                    .iter()
                    .map(|(trigger, typo)| format!("{}→{}", trigger, typo))
                    .collect();
                format!("Samples: {}", pairs.join(", "))
            }
        }
    }

    fn recalculate_lines(&mut self) {
        let layout_width = (self.terminal_width as usize * 80) / 100;
        let safe_width = layout_width.saturating_sub(2).max(1);
        let options = Options::new(safe_width);
        let lines = textwrap::wrap(&self.output, options);
        self.visual_lines = lines.into_iter().map(|c| c.into_owned()).collect();
    }
}
