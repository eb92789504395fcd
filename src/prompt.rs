//! # Interactive Trust Prompts
//!
//! When standard validation fails and no earlier acceptance matches, a human
//! decides. Two strategies answer the same question through
//! [`InteractivePrompt`]:
//! - a graphical dialog, supplied by the embedding application
//! - [`ConsolePrompt`], which prints the certificate summary and reads
//!   answers from an input stream
//!
//! The strategy is chosen once, from a [`PromptEnvironment`], by
//! [`select_prompt`].
//!
//! ## Console state machine
//!
//! The console prompt starts in `Prompting` and shows the summary before each
//! read. An answer equal to the affirmative token moves to `Accepted`; the
//! negative token, end of input or a read error move to `Rejected`. Anything
//! else keeps it in `Prompting`. End of input guarantees termination when the
//! stream is exhausted.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::certificate::{Certificate, CertificateDetails};
use crate::common::{TrustError, TrustResult, SERVER_MODE_KEY, UI_ANSWER_NO, UI_ANSWER_YES};
use crate::prompt_renderer::render;
use crate::settings::SettingsStore;

/// Capability to obtain a yes/no trust decision for a certificate.
pub trait InteractivePrompt: Send + Sync {
    /// Returns `true` only if the certificate was explicitly accepted.
    fn ask(&self, certificate: &dyn Certificate) -> bool;

    /// Asks with a deadline. Prompts that cannot be interrupted ignore it.
    fn ask_until(&self, certificate: &dyn Certificate, _deadline: Instant) -> bool {
        self.ask(certificate)
    }
}

/// Answers recognized by the console prompt, compared after lowercasing.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTokens {
    pub affirmative: String,
    pub negative: String,
}

impl PromptTokens {
    pub fn new(affirmative: &str, negative: &str) -> Self {
        Self {
            affirmative: affirmative.to_lowercase(),
            negative: negative.to_lowercase(),
        }
    }
}

impl Default for PromptTokens {
    fn default() -> Self {
        Self::new(UI_ANSWER_YES, UI_ANSWER_NO)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptState {
    Prompting,
    Accepted,
    Rejected,
}

enum InputLine {
    Line(String),
    End,
    Failed(String),
}

struct Console<R, W> {
    input: Option<R>,
    lines: Option<Receiver<InputLine>>,
    output: W,
}

/// Console strategy reading answers line by line.
///
/// Lines are read on a dedicated reader thread, started on the first
/// question, and handed over through a channel. A question asked with a
/// deadline gives up the console when the deadline passes, and the next
/// question receives whatever is typed after its summary is shown. Lines
/// typed while no question was displayed are discarded.
///
/// Concurrent questions are serialized: each one holds the console until it
/// reaches a decision (or its deadline), so summaries and answers from
/// different threads never interleave.
pub struct ConsolePrompt<R, W> {
    console: Mutex<Console<R, W>>,
    tokens: PromptTokens,
}

impl ConsolePrompt<BufReader<Stdin>, Stdout> {
    /// Console prompt on the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout(), PromptTokens::default())
    }
}

impl<R: BufRead + Send + 'static, W: Write + Send> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W, tokens: PromptTokens) -> Self {
        Self {
            console: Mutex::new(Console {
                input: Some(input),
                lines: None,
                output,
            }),
            tokens,
        }
    }

    /// Consumes the prompt, handing back its output.
    pub fn into_output(self) -> TrustResult<W> {
        let console = self
            .console
            .into_inner()
            .map_err(|e| TrustError::PromptIOError(format!("{:?}", e)))?;
        Ok(console.output)
    }

    fn next_state(&self, answer: Option<&str>) -> PromptState {
        match answer {
            None => PromptState::Rejected,
            Some(answer) if answer == self.tokens.affirmative => PromptState::Accepted,
            Some(answer) if answer == self.tokens.negative => PromptState::Rejected,
            Some(_) => PromptState::Prompting,
        }
    }

    fn spawn_reader(mut input: R) -> Receiver<InputLine> {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || loop {
            let mut line = String::new();
            let event = match input.read_line(&mut line) {
                Ok(0) => InputLine::End,
                Ok(_) => InputLine::Line(line.trim_end_matches(['\r', '\n']).to_string()),
                Err(e) => InputLine::Failed(e.to_string()),
            };
            let last = !matches!(event, InputLine::Line(_));
            if sender.send(event).is_err() || last {
                break;
            }
        });
        receiver
    }

    /// Drops answers typed before the summary was shown, keeping a pending
    /// end of input or read failure.
    fn discard_stale(lines: &Receiver<InputLine>) -> Option<InputLine> {
        loop {
            match lines.try_recv() {
                Ok(InputLine::Line(line)) => {
                    log::debug!("Discarding console input typed before the prompt: {:?}", line)
                }
                Ok(event) => return Some(event),
                Err(_) => return None,
            }
        }
    }

    fn next_line(lines: &Receiver<InputLine>, deadline: Option<Instant>) -> Option<InputLine> {
        match deadline {
            None => Some(lines.recv().unwrap_or(InputLine::End)),
            Some(deadline) => {
                match lines.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                    Ok(event) => Some(event),
                    Err(mpsc::RecvTimeoutError::Disconnected) => Some(InputLine::End),
                    Err(mpsc::RecvTimeoutError::Timeout) => None,
                }
            }
        }
    }

    /// Runs the prompt loop until a terminal state is reached.
    ///
    /// # Errors
    ///
    /// `TrustError::FingerprintFailed` if the summary cannot be rendered and
    /// `TrustError::PromptIOError` if reading or writing the console fails.
    pub fn decide(&self, certificate: &dyn Certificate) -> TrustResult<PromptState> {
        self.decide_until(certificate, None)
    }

    /// Like [`ConsolePrompt::decide`], but answers `Rejected` once `deadline`
    /// passes without a decision.
    pub fn decide_until(
        &self,
        certificate: &dyn Certificate,
        deadline: Option<Instant>,
    ) -> TrustResult<PromptState> {
        let summary = render(certificate)?;
        let mut console = self
            .console
            .lock()
            .map_err(|e| TrustError::PromptIOError(format!("{:?}", e)))?;
        let Console {
            input,
            lines,
            output,
        } = &mut *console;
        let mut pending = lines.as_ref().and_then(Self::discard_stale);
        if lines.is_none() {
            let input = input
                .take()
                .ok_or_else(|| TrustError::PromptIOError("console input unavailable".into()))?;
            *lines = Some(Self::spawn_reader(input));
        }
        let lines = lines
            .as_ref()
            .ok_or_else(|| TrustError::PromptIOError("console input unavailable".into()))?;
        let mut state = PromptState::Prompting;
        while state == PromptState::Prompting {
            writeln!(output, "{}", summary)
                .and_then(|_| output.flush())
                .map_err(|e| TrustError::PromptIOError(e.to_string()))?;
            let event = match pending.take() {
                Some(event) => event,
                None => match Self::next_line(lines, deadline) {
                    Some(event) => event,
                    None => {
                        log::warn!("Console prompt deadline passed without an answer");
                        return Ok(PromptState::Rejected);
                    }
                },
            };
            let answer = match event {
                InputLine::Line(line) => Some(line.to_lowercase()),
                InputLine::End => None,
                InputLine::Failed(e) => return Err(TrustError::PromptIOError(e)),
            };
            state = self.next_state(answer.as_deref());
            log::trace!("Console prompt answer {:?} -> {:?}", answer, state);
        }
        Ok(state)
    }

    fn report(result: TrustResult<PromptState>) -> bool {
        match result {
            Ok(state) => state == PromptState::Accepted,
            Err(e) => {
                log::error!("Console prompt failed: {}", e);
                eprintln!("{}", e);
                false
            }
        }
    }
}

impl<R: BufRead + Send + 'static, W: Write + Send> InteractivePrompt for ConsolePrompt<R, W> {
    fn ask(&self, certificate: &dyn Certificate) -> bool {
        Self::report(self.decide(certificate))
    }

    fn ask_until(&self, certificate: &dyn Certificate, deadline: Instant) -> bool {
        Self::report(self.decide_until(certificate, Some(deadline)))
    }
}

/// Runs another prompt on a worker thread and gives up after a timeout.
///
/// A timeout counts as a negative answer. The worker hands the deadline to
/// the inner prompt through [`InteractivePrompt::ask_until`]; the console
/// prompt honours it and frees the console, while a prompt that ignores it
/// keeps the worker busy until it answers, and that late answer is discarded.
pub struct TimedPrompt {
    inner: Arc<dyn InteractivePrompt>,
    timeout: Duration,
}

impl TimedPrompt {
    pub fn new(inner: Arc<dyn InteractivePrompt>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl InteractivePrompt for TimedPrompt {
    fn ask(&self, certificate: &dyn Certificate) -> bool {
        self.ask_until(certificate, Instant::now() + self.timeout)
    }

    fn ask_until(&self, certificate: &dyn Certificate, deadline: Instant) -> bool {
        let details = match CertificateDetails::from_certificate(certificate) {
            Ok(details) => details,
            Err(e) => {
                log::error!("Unable to hand certificate to prompt worker: {}", e);
                return false;
            }
        };
        let inner = self.inner.clone();
        let (sender, receiver) = mpsc::sync_channel(1);
        thread::spawn(move || {
            let _ = sender.send(inner.ask_until(&details, deadline));
        });
        let timeout = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(timeout) {
            Ok(answer) => answer,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!("No answer within {:?}, rejecting certificate", self.timeout);
                false
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                log::error!("Prompt worker exited without an answer");
                false
            }
        }
    }
}

/// Signals used to pick a prompt strategy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PromptEnvironment {
    pub server_mode: bool,
    pub display_available: bool,
}

impl PromptEnvironment {
    /// Reads the server mode flag from settings and checks for a display.
    pub fn detect(settings: &dyn SettingsStore) -> TrustResult<Self> {
        Ok(Self {
            server_mode: settings.get_bool(SERVER_MODE_KEY)?,
            display_available: display_available(),
        })
    }

    pub fn is_headless(&self) -> bool {
        self.server_mode || !self.display_available
    }
}

#[cfg(any(target_os = "windows", target_os = "macos"))]
fn display_available() -> bool {
    true
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn display_available() -> bool {
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|name| std::env::var_os(name).is_some_and(|value| !value.is_empty()))
}

/// Picks the graphical prompt unless the environment is headless or no
/// graphical prompt was supplied, in which case the console prompt is used.
pub fn select_prompt(
    environment: &PromptEnvironment,
    graphical: Option<Arc<dyn InteractivePrompt>>,
    console: Arc<dyn InteractivePrompt>,
) -> Arc<dyn InteractivePrompt> {
    match graphical {
        Some(graphical) if !environment.is_headless() => graphical,
        _ => {
            log::debug!("Using console prompt (headless: {})", environment.is_headless());
            console
        }
    }
}
