//! Capability-checked voice input.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use cropsage_core::Language;

use crate::command::CommandTemplate;
use crate::error::VoiceError;

/// A speech-recognition backend producing one transcript per call.
#[async_trait]
pub trait Recognizer: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Listens once with the recognizer set to `locale_tag` (e.g. `hi-IN`).
    async fn recognize(&self, locale_tag: &str) -> Result<String, VoiceError>;
}

/// Voice input adapter used by the "speak" action.
#[derive(Clone)]
pub struct VoiceInput {
    recognizer: Arc<dyn Recognizer>,
}

impl VoiceInput {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self { recognizer }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    /// Recognizes a single utterance in `language`.
    ///
    /// # Errors
    ///
    /// [`VoiceError::Unsupported`] when no recognizer is available (nothing is
    /// started), [`VoiceError::Recognition`] when recognition fails or hears
    /// nothing.
    pub async fn listen_once(&self, language: Language) -> Result<String, VoiceError> {
        if !self.recognizer.is_supported() {
            return Err(VoiceError::Unsupported);
        }

        let locale = language.locale_tag();
        tracing::debug!(locale, "listening for voice input");
        let transcript = self.recognizer.recognize(locale).await?;
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(VoiceError::Recognition("no speech recognized".to_string()));
        }
        Ok(transcript.to_owned())
    }
}

/// Recognizer for platforms without voice input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecognizer;

#[async_trait]
impl Recognizer for NoRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn recognize(&self, _locale_tag: &str) -> Result<String, VoiceError> {
        Err(VoiceError::Unsupported)
    }
}

/// Recognizer that runs an external speech-to-text program and reads the
/// transcript from its stdout.
///
/// `{locale}` and `{lang}` in the template receive the language; the program
/// must exit non-zero on failure.
#[derive(Debug, Clone)]
pub struct CommandRecognizer {
    template: CommandTemplate,
}

impl CommandRecognizer {
    #[must_use]
    pub fn new(template: CommandTemplate) -> Self {
        Self { template }
    }

    /// Builds a recognizer from a template string; `None` if it is blank.
    #[must_use]
    pub fn from_template(template: &str) -> Option<Self> {
        CommandTemplate::parse(template).map(Self::new)
    }
}

#[async_trait]
impl Recognizer for CommandRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    async fn recognize(&self, locale_tag: &str) -> Result<String, VoiceError> {
        let lang = locale_tag.split('-').next().unwrap_or(locale_tag);
        let output = self
            .template
            .command(&[("locale", locale_tag), ("lang", lang)])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                VoiceError::Recognition(format!("{} subprocess error: {e}", self.template.program()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoiceError::Recognition(format!(
                "{} exited with {}: {}",
                self.template.program(),
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| VoiceError::Recognition(format!("transcript is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct ScriptedRecognizer {
        transcript: Result<String, String>,
        locales: Mutex<Vec<String>>,
    }

    impl ScriptedRecognizer {
        fn hearing(text: &str) -> Self {
            Self {
                transcript: Ok(text.to_string()),
                locales: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Recognizer for ScriptedRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        async fn recognize(&self, locale_tag: &str) -> Result<String, VoiceError> {
            self.locales.lock().unwrap().push(locale_tag.to_string());
            self.transcript.clone().map_err(VoiceError::Recognition)
        }
    }

    #[tokio::test]
    async fn listen_once_sets_locale_before_recognizing() {
        let recognizer = Arc::new(ScriptedRecognizer::hearing("पत्ते पीले हैं"));
        let voice = VoiceInput::new(Arc::clone(&recognizer) as Arc<dyn Recognizer>);

        let text = voice.listen_once(Language::Hindi).await.unwrap();

        assert_eq!(text, "पत्ते पीले हैं");
        assert_eq!(*recognizer.locales.lock().unwrap(), vec!["hi-IN"]);
    }

    #[tokio::test]
    async fn listen_once_trims_transcript() {
        let voice = VoiceInput::new(Arc::new(ScriptedRecognizer::hearing("  wilting\n")));
        assert_eq!(voice.listen_once(Language::English).await.unwrap(), "wilting");
    }

    #[tokio::test]
    async fn blank_transcript_is_recognition_error() {
        let voice = VoiceInput::new(Arc::new(ScriptedRecognizer::hearing("   ")));
        let result = voice.listen_once(Language::Marathi).await;
        assert!(matches!(result, Err(VoiceError::Recognition(_))));
    }

    #[tokio::test]
    async fn recognizer_failure_is_propagated() {
        let recognizer = ScriptedRecognizer {
            transcript: Err("microphone busy".to_string()),
            locales: Mutex::new(Vec::new()),
        };
        let voice = VoiceInput::new(Arc::new(recognizer));
        let result = voice.listen_once(Language::English).await;
        assert!(matches!(result, Err(VoiceError::Recognition(ref m)) if m == "microphone busy"));
    }

    #[tokio::test]
    async fn unsupported_recognizer_fails_fast() {
        let voice = VoiceInput::new(Arc::new(NoRecognizer));
        assert!(!voice.is_supported());
        assert!(matches!(
            voice.listen_once(Language::English).await,
            Err(VoiceError::Unsupported)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_recognizer_reads_stdout() {
        let voice = VoiceInput::new(Arc::new(
            CommandRecognizer::from_template("echo heard-{locale}").unwrap(),
        ));
        assert_eq!(
            voice.listen_once(Language::Marathi).await.unwrap(),
            "heard-mr-IN"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_recognizer_nonzero_exit_is_recognition_error() {
        let recognizer = CommandRecognizer::from_template("false").unwrap();
        let result = recognizer.recognize("en-IN").await;
        assert!(matches!(result, Err(VoiceError::Recognition(_))));
    }
}
