//! Handlers for the farmer-facing commands: diagnosis, store lookup, and the
//! standalone voice and speech actions.

use std::sync::Arc;

use cropsage_api::CropSageClient;
use cropsage_core::{AppConfig, Coordinates, Language, StoreRecord};
use cropsage_workflow::{
    resolve_coordinates, CommandRecognizer, CommandSpeechEngine, DiagnosisController,
    DiagnosisOutcome, DiagnosisView, FixedGeolocator, Geolocator, MyMemoryTranslator,
    NoGeolocator, NoRecognizer, Recognizer, SilentSpeechEngine, SpeechEngine, SpeechOutput,
    SpeechSink, VoiceInput,
};

use crate::admin::StoreFields;

#[derive(Debug, Clone, Copy)]
pub(crate) struct DiagnoseOptions {
    pub(crate) language: Language,
    pub(crate) listen: bool,
    pub(crate) speak: bool,
    pub(crate) json: bool,
}

/// Run one diagnosis and print the result.
///
/// With `listen`, a recognized transcript replaces the typed query; when voice
/// input fails the typed query is used unchanged.
///
/// # Errors
///
/// Returns an error for an empty query, an unreachable classifier, or invalid
/// client configuration. Translation, store lookup, and speech failures only
/// degrade the output.
pub(crate) async fn run_diagnose(
    config: &AppConfig,
    typed_query: &str,
    options: &DiagnoseOptions,
) -> anyhow::Result<()> {
    let mut query = typed_query.to_owned();
    if options.listen {
        match voice_input(config).listen_once(options.language).await {
            Ok(heard) => {
                eprintln!("heard: {heard}");
                query = heard;
            }
            Err(e) => eprintln!("voice input failed: {e}"),
        }
    }

    let coords = session_coordinates(config).await;
    let speech = speech_output(config, options.speak);
    let controller = DiagnosisController::new(
        Arc::new(MyMemoryTranslator::from_config(config)?),
        Arc::new(CropSageClient::from_config(config)?),
        Arc::clone(&speech) as Arc<dyn SpeechSink>,
    );

    let outcome = controller
        .run_diagnosis(&query, options.language, coords)
        .await?;
    if let DiagnosisOutcome::Rendered(view) = outcome {
        if options.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print_view(&view);
        }
    }

    speech.finish().await;
    Ok(())
}

/// List stores within `radius` km of the session position.
///
/// # Errors
///
/// Returns an error if the radius is not positive or the lookup fails.
pub(crate) async fn run_stores(config: &AppConfig, radius: f64, json: bool) -> anyhow::Result<()> {
    anyhow::ensure!(
        radius.is_finite() && radius > 0.0,
        "radius must be a positive number of kilometres"
    );

    let coords = session_coordinates(config).await;
    let stores = CropSageClient::from_config(config)?
        .nearby_stores(coords, radius)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stores)?);
    } else {
        print_stores(&stores, coords);
    }
    Ok(())
}

/// Submit a store through the public endpoint.
///
/// # Errors
///
/// Returns an error if the backend rejects the store.
pub(crate) async fn run_add_store(config: &AppConfig, fields: StoreFields) -> anyhow::Result<()> {
    let store = fields.into_record(None);
    let created = CropSageClient::from_config(config)?
        .add_store(&store)
        .await?;
    println!("added store '{}'", created.name);
    Ok(())
}

/// # Errors
///
/// Returns an error when voice input is unsupported or hears nothing.
pub(crate) async fn run_listen(config: &AppConfig, language: Language) -> anyhow::Result<()> {
    let transcript = voice_input(config).listen_once(language).await?;
    println!("{transcript}");
    Ok(())
}

/// # Errors
///
/// Returns an error when no speech engine is configured. Synthesis failures
/// are logged, not returned.
pub(crate) async fn run_speak(
    config: &AppConfig,
    text: &str,
    language: Language,
) -> anyhow::Result<()> {
    let speech = speech_output(config, true);
    if !speech.is_supported() {
        anyhow::bail!("speech output is not available; set CROPSAGE_TTS_COMMAND");
    }
    speech.speak(text, language).await;
    speech.finish().await;
    Ok(())
}

fn speech_output(config: &AppConfig, enabled: bool) -> Arc<SpeechOutput> {
    let engine: Arc<dyn SpeechEngine> = match config
        .tts_command
        .as_deref()
        .filter(|_| enabled)
        .and_then(CommandSpeechEngine::from_template)
    {
        Some(engine) => Arc::new(engine),
        None => Arc::new(SilentSpeechEngine),
    };
    Arc::new(SpeechOutput::new(engine))
}

fn voice_input(config: &AppConfig) -> VoiceInput {
    let recognizer: Arc<dyn Recognizer> = match config
        .stt_command
        .as_deref()
        .and_then(CommandRecognizer::from_template)
    {
        Some(recognizer) => Arc::new(recognizer),
        None => Arc::new(NoRecognizer),
    };
    VoiceInput::new(recognizer)
}

async fn session_coordinates(config: &AppConfig) -> Coordinates {
    let geolocator: Box<dyn Geolocator> = match config.location {
        Some(coords) => Box::new(FixedGeolocator(coords)),
        None => Box::new(NoGeolocator),
    };
    resolve_coordinates(geolocator.as_ref()).await
}

fn print_view(view: &DiagnosisView) {
    println!("Issue: {}", view.result.issue);
    if view.result.remedies.is_empty() {
        println!("Remedies: none listed");
    } else {
        println!("Remedies:");
        for remedy in &view.result.remedies {
            println!("  - {remedy}");
        }
    }
    println!();
    print_stores(&view.stores, view.coordinates);
}

/// Print stores nearest first, with their distance from `origin`.
fn print_stores(stores: &[StoreRecord], origin: Coordinates) {
    if stores.is_empty() {
        println!("no stores found nearby");
        return;
    }

    let mut by_distance: Vec<(f64, &StoreRecord)> = stores
        .iter()
        .map(|s| (origin.distance_km(&s.coordinates()), s))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    let header = format!("{:<30}{:>9}  {:<16}ADDRESS", "STORE", "DISTANCE", "PHONE");
    println!("{header}");
    for (km, store) in by_distance {
        println!(
            "{:<30}{:>6.1} km  {:<16}{}",
            store.name, km, store.phone, store.address
        );
    }
}
