//! Multilingual query-and-diagnosis workflow.
//!
//! [`DiagnosisController`] drives one "analyze" action end to end: translate
//! the query to English, classify it, translate the answer back, look up
//! nearby stores, and speak the result. Every outside capability (translation,
//! the backend, speech, voice, location) sits behind a trait so it can be
//! swapped for a fake.

pub mod backend;
pub mod command;
pub mod controller;
pub mod error;
pub mod geo;
pub mod speech;
pub mod translate;
pub mod voice;

pub use backend::DiagnosisBackend;
pub use controller::{DiagnosisController, DiagnosisOutcome, DiagnosisView};
pub use error::{GeoError, SpeechError, TranslateError, VoiceError, WorkflowError};
pub use geo::{resolve_coordinates, FixedGeolocator, Geolocator, NoGeolocator};
pub use speech::{
    spoken_summary, CommandSpeechEngine, SilentSpeechEngine, SpeechEngine, SpeechOutput,
    SpeechSink, Utterance,
};
pub use translate::{translate_or_original, MyMemoryTranslator, Translator};
pub use voice::{CommandRecognizer, NoRecognizer, Recognizer, VoiceInput};
