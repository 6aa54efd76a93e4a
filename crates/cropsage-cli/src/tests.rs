use super::*;
use crate::admin::{ProblemCommands, StoreCommands};

#[test]
fn parses_multi_word_diagnose_query() {
    let cli = Cli::try_parse_from(["cropsage", "diagnose", "yellow", "leaves", "on", "tomato"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Diagnose {
            ref query,
            lang: None,
            listen: false,
            no_speak: false,
            json: false,
        } if query.join(" ") == "yellow leaves on tomato"
    ));
}

#[test]
fn parses_diagnose_language_and_flags() {
    let cli = Cli::try_parse_from([
        "cropsage",
        "diagnose",
        "--lang",
        "HI",
        "--listen",
        "--no-speak",
        "--json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Diagnose {
            lang: Some(Language::Hindi),
            listen: true,
            no_speak: true,
            json: true,
            ..
        }
    ));
}

#[test]
fn rejects_unknown_language() {
    let result = Cli::try_parse_from(["cropsage", "diagnose", "--lang", "fr", "wilting"]);
    assert!(result.is_err());
}

#[test]
fn stores_radius_defaults_to_five_km() {
    let cli = Cli::try_parse_from(["cropsage", "stores"]).expect("expected valid cli args");
    match cli.command {
        Commands::Stores { radius, json } => {
            assert!((radius - 5.0).abs() < f64::EPSILON);
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_speak_with_language() {
    let cli = Cli::try_parse_from(["cropsage", "speak", "नमस्कार", "--lang", "mr"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Speak {
            ref text,
            lang: Some(Language::Marathi),
        } if text == "नमस्कार"
    ));
}

#[test]
fn parses_add_store_fields() {
    let cli = Cli::try_parse_from([
        "cropsage",
        "add-store",
        "--name",
        "Kisan Seva Kendra",
        "--address",
        "Station Road",
        "--lat",
        "19.99",
        "--lng",
        "73.78",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::AddStore { fields } => {
            let record = fields.into_record(None);
            assert_eq!(record.name, "Kisan Seva Kendra");
            assert_eq!(record.phone, "");
            assert!(record.id.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_admin_login() {
    let cli = Cli::try_parse_from([
        "cropsage",
        "admin",
        "login",
        "--username",
        "admin",
        "--password",
        "secret",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Admin {
            command: AdminCommands::Login { ref username, ref password }
        } if username == "admin" && password == "secret"
    ));
}

#[test]
fn parses_repeated_remedies_in_order() {
    let cli = Cli::try_parse_from([
        "cropsage",
        "admin",
        "problems",
        "add",
        "--name",
        "Nitrogen Deficiency",
        "--remedy",
        "Apply urea",
        "--remedy",
        "Add compost",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Admin {
            command:
                AdminCommands::Problems {
                    command: ProblemCommands::Add(problem),
                },
        } => {
            assert_eq!(problem.remedies, vec!["Apply urea", "Add compost"]);
            assert_eq!(problem.severity, "medium");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_admin_store_delete() {
    let cli = Cli::try_parse_from(["cropsage", "admin", "stores", "delete", "7"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Admin {
            command: AdminCommands::Stores {
                command: StoreCommands::Delete { id: 7 }
            }
        }
    ));
}

#[test]
fn diagnose_requires_no_query_when_listening() {
    let cli = Cli::try_parse_from(["cropsage", "diagnose", "--listen"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Diagnose { listen: true, .. }));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["cropsage"]).is_err());
}
