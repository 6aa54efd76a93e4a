//! Spoken output of diagnosis results.
//!
//! [`SpeechOutput`] keeps at most one utterance audible: every call cancels
//! whatever is playing before starting, and there is no queue.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cropsage_core::{DiagnosisResult, Language};
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio::sync::Mutex;

use crate::command::CommandTemplate;
use crate::error::SpeechError;

pub const SPEECH_RATE: f32 = 0.95;
pub const SPEECH_PITCH: f32 = 1.0;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One thing to say, with its voice settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: Language,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    #[must_use]
    pub fn new(text: &str, language: Language) -> Self {
        Self {
            text: text.to_owned(),
            language,
            rate: SPEECH_RATE,
            pitch: SPEECH_PITCH,
        }
    }

    #[must_use]
    pub fn locale_tag(&self) -> &'static str {
        self.language.locale_tag()
    }
}

/// A synthesizer backend.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Stops the utterance in progress, if any.
    async fn cancel(&self) -> Result<(), SpeechError>;

    /// Starts speaking and returns without waiting for playback to end.
    async fn start(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Waits for the utterance in progress to finish.
    async fn wait(&self) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Where the diagnosis workflow sends its spoken summary. Never fails.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn speak(&self, text: &str, language: Language);
}

/// Cancel-then-speak adapter over a [`SpeechEngine`].
pub struct SpeechOutput {
    engine: Arc<dyn SpeechEngine>,
    // Serialises cancel+start pairs so two overlapping calls cannot both end
    // up audible.
    turn: Mutex<()>,
}

impl SpeechOutput {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            turn: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.engine.is_supported()
    }

    /// Blocks until the current utterance has been spoken. Errors are ignored.
    pub async fn finish(&self) {
        if let Err(e) = self.engine.wait().await {
            tracing::debug!(error = %e, "speech wait failed");
        }
    }
}

#[async_trait]
impl SpeechSink for SpeechOutput {
    async fn speak(&self, text: &str, language: Language) {
        if !self.engine.is_supported() {
            return;
        }

        let _turn = self.turn.lock().await;
        if let Err(e) = self.engine.cancel().await {
            tracing::debug!(error = %e, "speech cancel failed");
        }
        let utterance = Utterance::new(text, language);
        if let Err(e) = self.engine.start(&utterance).await {
            tracing::debug!(lang = %language, error = %e, "speech synthesis failed");
        }
    }
}

/// Sentence read aloud after a diagnosis, in the result's language.
#[must_use]
pub fn spoken_summary(result: &DiagnosisResult, language: Language) -> String {
    let remedies = result.remedies.join(", ");
    match language {
        Language::English => format!(
            "The detected issue is {}. Remedies are: {remedies}",
            result.issue
        ),
        Language::Hindi => format!("समस्या है {}. उपाय हैं: {remedies}", result.issue),
        Language::Marathi => format!("समस्या आहे {}. उपाय आहेत: {remedies}", result.issue),
    }
}

/// Engine that cannot speak. [`SpeechOutput::speak`] becomes a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeechEngine;

#[async_trait]
impl SpeechEngine for SilentSpeechEngine {
    fn is_supported(&self) -> bool {
        false
    }

    async fn cancel(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    async fn start(&self, _utterance: &Utterance) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }
}

/// Engine that runs an external text-to-speech program per utterance.
///
/// The program is killed on cancel. When the template has no `{text}`
/// placeholder the text is written to the program's stdin.
pub struct CommandSpeechEngine {
    template: CommandTemplate,
    current: Mutex<Option<Child>>,
}

impl CommandSpeechEngine {
    #[must_use]
    pub fn new(template: CommandTemplate) -> Self {
        Self {
            template,
            current: Mutex::new(None),
        }
    }

    /// Builds an engine from a template string; `None` if it is blank.
    #[must_use]
    pub fn from_template(template: &str) -> Option<Self> {
        CommandTemplate::parse(template).map(Self::new)
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    fn is_supported(&self) -> bool {
        true
    }

    async fn cancel(&self) -> Result<(), SpeechError> {
        let mut current = self.current.lock().await;
        if let Some(mut child) = current.take() {
            // Already exited is fine.
            if let Ok(None) = child.try_wait() {
                child
                    .kill()
                    .await
                    .map_err(|e| SpeechError::Synthesis(format!("cannot stop speech: {e}")))?;
            }
        }
        Ok(())
    }

    async fn start(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let rate = utterance.rate.to_string();
        let pitch = utterance.pitch.to_string();
        let text_in_args = self.template.uses("text");
        let mut command = self.template.command(&[
            ("locale", utterance.locale_tag()),
            ("lang", utterance.language.code()),
            ("rate", &rate),
            ("pitch", &pitch),
            ("text", &utterance.text),
        ]);
        command
            .stdin(if text_in_args {
                Stdio::null()
            } else {
                Stdio::piped()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|e| {
            SpeechError::Synthesis(format!("{} subprocess error: {e}", self.template.program()))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(utterance.text.as_bytes())
                .await
                .map_err(|e| SpeechError::Synthesis(format!("cannot send text: {e}")))?;
        }

        *self.current.lock().await = Some(child);
        Ok(())
    }

    async fn wait(&self) -> Result<(), SpeechError> {
        // Polls instead of awaiting the child so `cancel` can take the lock
        // and kill it at any time.
        loop {
            {
                let mut current = self.current.lock().await;
                let Some(child) = current.as_mut() else {
                    return Ok(());
                };
                match child.try_wait() {
                    Ok(None) => {}
                    Ok(Some(status)) => {
                        current.take();
                        if !status.success() {
                            return Err(SpeechError::Synthesis(format!(
                                "{} exited with {status}",
                                self.template.program()
                            )));
                        }
                        return Ok(());
                    }
                    Err(e) => {
                        current.take();
                        return Err(SpeechError::Synthesis(e.to_string()));
                    }
                }
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
#[path = "speech_test.rs"]
mod tests;
