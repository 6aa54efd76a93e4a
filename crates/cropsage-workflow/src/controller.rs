//! Diagnosis workflow controller.
//!
//! One call to [`DiagnosisController::run_diagnosis`] is one press of
//! "Analyze":
//!
//! 1. Reject blank input before anything is sent.
//! 2. Translate the query to English (falls back to the original text).
//! 3. Classify. The only fatal step.
//! 4. Translate the issue and each remedy back, concurrently and per string.
//! 5. Fetch nearby stores, concurrently with 4 (falls back to no stores).
//! 6. Speak the summary, after 4.
//!
//! Every call takes a ticket from a monotonically increasing sequence. Only the
//! newest ticket may replace the displayed view, so a slow earlier request can
//! never overwrite the output of a later one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cropsage_core::{Coordinates, DiagnosisResult, Language, StoreRecord, NEARBY_RADIUS};
use futures::future::join_all;
use serde::Serialize;

use crate::backend::DiagnosisBackend;
use crate::error::WorkflowError;
use crate::speech::{spoken_summary, SpeechSink};
use crate::translate::{translate_or_original, Translator};

/// What the user sees after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisView {
    pub invocation: u64,
    pub language: Language,
    pub query: String,
    /// Issue and remedies already in `language`.
    pub result: DiagnosisResult,
    pub stores: Vec<StoreRecord>,
    pub coordinates: Coordinates,
    pub spoken: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosisOutcome {
    /// This run was the newest one and its view is now displayed.
    Rendered(DiagnosisView),
    /// A newer run (or a reset) was dispatched meanwhile; nothing displayed.
    Superseded,
}

#[derive(Default)]
struct Display {
    latest: u64,
    view: Option<DiagnosisView>,
}

pub struct DiagnosisController {
    translator: Arc<dyn Translator>,
    backend: Arc<dyn DiagnosisBackend>,
    speech: Arc<dyn SpeechSink>,
    display: Mutex<Display>,
}

impl DiagnosisController {
    pub fn new(
        translator: Arc<dyn Translator>,
        backend: Arc<dyn DiagnosisBackend>,
        speech: Arc<dyn SpeechSink>,
    ) -> Self {
        Self {
            translator,
            backend,
            speech,
            display: Mutex::new(Display::default()),
        }
    }

    /// The currently displayed view, if any.
    #[must_use]
    pub fn current(&self) -> Option<DiagnosisView> {
        self.display().view.clone()
    }

    /// Clears the display and supersedes every run in flight.
    pub fn reset(&self) {
        let mut display = self.display();
        display.latest += 1;
        display.view = None;
    }

    /// Runs the full workflow for `query` in `language` at `coords`.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::EmptyInput`] if `query` is blank; no call is made and
    ///   runs in flight are not superseded.
    /// - [`WorkflowError::Classification`] if the classifier fails; the
    ///   previously displayed view is left untouched.
    pub async fn run_diagnosis(
        &self,
        query: &str,
        language: Language,
        coords: Coordinates,
    ) -> Result<DiagnosisOutcome, WorkflowError> {
        if query.trim().is_empty() {
            return Err(WorkflowError::EmptyInput);
        }

        let ticket = self.dispatch();
        tracing::info!(invocation = ticket, lang = %language, "diagnosis started");

        let english =
            translate_or_original(&*self.translator, query, language, Language::English).await;

        let classified = match self.backend.classify(&english).await {
            Ok(result) => result,
            Err(e) if !self.is_latest(ticket) => {
                tracing::debug!(invocation = ticket, error = %e, "stale classification failed");
                return Ok(DiagnosisOutcome::Superseded);
            }
            Err(e) => {
                tracing::warn!(invocation = ticket, error = %e, "classification failed");
                return Err(WorkflowError::Classification(e));
            }
        };

        if !self.is_latest(ticket) {
            tracing::debug!(invocation = ticket, "superseded after classification");
            return Ok(DiagnosisOutcome::Superseded);
        }

        let (result, stores) = tokio::join!(
            self.localize(classified, language),
            self.stores_or_empty(coords),
        );

        let spoken = spoken_summary(&result, language);
        let view = DiagnosisView {
            invocation: ticket,
            language,
            query: query.to_owned(),
            result,
            stores,
            coordinates: coords,
            spoken,
        };

        if !self.commit(ticket, &view) {
            tracing::debug!(invocation = ticket, "superseded before display");
            return Ok(DiagnosisOutcome::Superseded);
        }

        tracing::info!(
            invocation = ticket,
            issue = %view.result.issue,
            remedies = view.result.remedies.len(),
            stores = view.stores.len(),
            "diagnosis displayed"
        );

        self.speech.speak(&view.spoken, language).await;
        Ok(DiagnosisOutcome::Rendered(view))
    }

    fn display(&self) -> MutexGuard<'_, Display> {
        // The guarded data is plain values; a panicked writer cannot leave it
        // half-updated.
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self) -> u64 {
        let mut display = self.display();
        display.latest += 1;
        display.latest
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.display().latest == ticket
    }

    fn commit(&self, ticket: u64, view: &DiagnosisView) -> bool {
        let mut display = self.display();
        if display.latest != ticket {
            return false;
        }
        display.view = Some(view.clone());
        true
    }

    /// Translates the issue and every remedy out of English, each falling back
    /// to its English text independently.
    async fn localize(&self, result: DiagnosisResult, language: Language) -> DiagnosisResult {
        if language.is_canonical() {
            return result;
        }

        let translator = &*self.translator;
        let issue = translate_or_original(translator, &result.issue, Language::English, language);
        let remedies = join_all(
            result
                .remedies
                .iter()
                .map(|r| translate_or_original(translator, r, Language::English, language)),
        );
        let (issue, remedies) = tokio::join!(issue, remedies);

        DiagnosisResult { issue, remedies }
    }

    async fn stores_or_empty(&self, coords: Coordinates) -> Vec<StoreRecord> {
        match self.backend.nearby_stores(coords, NEARBY_RADIUS).await {
            Ok(stores) => stores,
            Err(e) => {
                tracing::warn!(error = %e, "nearby store lookup failed, showing no stores");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
