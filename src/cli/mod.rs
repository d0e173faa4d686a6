//! Command-line interface.
//!
//! Arguments are parsed by hand into a [`Command`], then [`execute`] runs it
//! against an [`Advisor`] and returns the text to print.

mod render;

pub use render::{render_history, render_parsed, render_pets, render_symptom_report};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::advisor::Advisor;
use crate::backends::BackendSelector;
use crate::error::{AppError, StorageError};
use crate::history::pet_key;
use crate::prompts::{Language, ReportType};
use crate::traits::{parse_age, Gender, HistoryStore, NewPet, PetStore};

/// Usage text.
pub const HELP: &str = "\
Usage: petcare-advisor <command> [args]

Commands:
  check <symptoms...>        Assess symptoms for the current pet
  quick <symptoms...>        Short answer, nothing is saved
  report [type]              Health report for the current pet
                             (basic, comprehensive, detailed, emergency)
  pets                       List pets
  add-pet <name> <breed...> <age> <gender>
                             Add a pet (the first pet becomes current)
  use-pet <id>               Select the current pet
  history                    Symptom history and recurring patterns
  models                     Models installed on each local server
  help                       Show this message

Press Ctrl-C to cancel a running request.";

// ============================================================================
// Commands
// ============================================================================

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Full symptom analysis.
    Check {
        /// Symptom description.
        symptoms: String,
    },
    /// Quick check.
    Quick {
        /// Symptom description.
        symptoms: String,
    },
    /// Health report for the current pet.
    Report {
        /// Report depth.
        report_type: ReportType,
    },
    /// List pets.
    Pets,
    /// Add a pet.
    AddPet {
        /// Fields of the new pet.
        pet: NewPet,
    },
    /// Select the current pet.
    UsePet {
        /// Pet id.
        id: String,
    },
    /// Symptom history of the current pet.
    History,
    /// List local models.
    Models,
    /// Show usage.
    Help,
}

impl Command {
    /// Parse a command from arguments, program name excluded.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParseError`] for a missing or unknown command, or a
    /// missing or invalid argument.
    pub fn parse(args: &[String]) -> Result<Self, CommandParseError> {
        let Some(first) = args.first() else {
            return Err(CommandParseError::MissingCommand);
        };
        let rest = &args[1..];

        let cmd = first.to_lowercase();
        match cmd.as_str() {
            "check" => Ok(Self::Check {
                symptoms: joined(rest, "symptoms")?,
            }),

            "quick" => Ok(Self::Quick {
                symptoms: joined(rest, "symptoms")?,
            }),

            "report" => {
                let report_type = match rest {
                    [] => ReportType::default(),
                    [value] => value.parse().map_err(|_| CommandParseError::InvalidValue {
                        arg: "report type".into(),
                        value: value.clone(),
                    })?,
                    [_, extra, ..] => return Err(CommandParseError::UnexpectedArgument(extra.clone())),
                };
                Ok(Self::Report { report_type })
            }

            "pets" => Ok(Self::Pets),

            "add-pet" => parse_new_pet(rest).map(|pet| Self::AddPet { pet }),

            "use-pet" => match rest {
                [id] => Ok(Self::UsePet { id: id.clone() }),
                [] => Err(CommandParseError::MissingValue("id".into())),
                [_, extra, ..] => Err(CommandParseError::UnexpectedArgument(extra.clone())),
            },

            "history" => Ok(Self::History),

            "models" => Ok(Self::Models),

            "help" | "--help" | "-h" => Ok(Self::Help),

            _ => Err(CommandParseError::UnknownCommand(cmd)),
        }
    }
}

/// Join free-text arguments; at least one non-blank word is required.
fn joined(args: &[String], name: &str) -> Result<String, CommandParseError> {
    let text = args.join(" ").trim().to_string();
    if text.is_empty() {
        return Err(CommandParseError::MissingValue(name.into()));
    }
    Ok(text)
}

/// `<name> <breed...> <age> <gender>`; the breed may span several words.
fn parse_new_pet(args: &[String]) -> Result<NewPet, CommandParseError> {
    let [name, breed @ .., age, gender] = args else {
        return Err(CommandParseError::MissingValue(
            "<name> <breed> <age> <gender>".into(),
        ));
    };
    if breed.is_empty() {
        return Err(CommandParseError::MissingValue("breed".into()));
    }
    if parse_age(age).is_none() {
        return Err(CommandParseError::InvalidValue {
            arg: "age".into(),
            value: age.clone(),
        });
    }

    let gender: Gender = gender.parse().unwrap_or_default();
    Ok(NewPet::new(name.clone(), breed.join(" "), age.clone(), gender))
}

// ============================================================================
// Command Parse Error
// ============================================================================

/// Error parsing CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    /// No command provided.
    #[error("No command provided. Use 'help' for available commands.")]
    MissingCommand,
    /// Unknown command.
    #[error("Unknown command: '{0}'. Use 'help' for available commands.")]
    UnknownCommand(String),
    /// Required argument missing.
    #[error("Missing value for '{0}'")]
    MissingValue(String),
    /// Argument present but invalid.
    #[error("Invalid value '{value}' for '{arg}'")]
    InvalidValue {
        /// The argument with the invalid value.
        arg: String,
        /// The invalid value that was provided.
        value: String,
    },
    /// More arguments than the command takes.
    #[error("Unexpected argument: '{0}'")]
    UnexpectedArgument(String),
}

// ============================================================================
// Execution
// ============================================================================

/// Run a command and return the text to print.
///
/// # Errors
///
/// Returns [`AppError`] if the advisor flow, the store or a backend call
/// fails, or if the command was cancelled.
pub async fn execute<S, H>(
    command: Command,
    advisor: &Advisor<S, H>,
    selector: &BackendSelector,
    language: Language,
    cancel: CancellationToken,
) -> Result<String, AppError>
where
    S: PetStore,
    H: HistoryStore,
{
    match command {
        Command::Check { symptoms } => {
            let profile = advisor.pets().get_current_pet().await?;
            let report = advisor
                .check_symptoms(&symptoms, profile.as_ref(), language, cancel)
                .await?;
            Ok(render_symptom_report(&report))
        }

        Command::Quick { symptoms } => {
            let parsed = advisor.quick_check(&symptoms, language, cancel).await?;
            Ok(render_parsed(&parsed))
        }

        Command::Report { report_type } => {
            let parsed = advisor
                .generate_current_report(report_type, language, cancel)
                .await?;
            Ok(render_parsed(&parsed))
        }

        Command::Pets => {
            let pets = advisor.pets().get_all_pets().await?;
            let current = advisor.pets().get_current_pet().await?;
            let stats = advisor.pets().stats().await?;
            Ok(render_pets(&pets, current.as_ref().map(|p| p.id.as_str()), &stats))
        }

        Command::AddPet { pet } => {
            let added = advisor.pets().add_pet(pet).await?;
            let current = advisor.pets().get_current_pet().await?;
            let mut out = format!("Added {} ({})", added.name, added.id);
            if current.is_some_and(|p| p.id == added.id) {
                out.push_str("\nNow advising on ");
                out.push_str(&added.name);
            }
            Ok(out)
        }

        Command::UsePet { id } => {
            let pet = advisor
                .pets()
                .get_pet(&id)
                .await?
                .ok_or_else(|| StorageError::PetNotFound { pet_id: id.clone() })?;
            advisor.pets().set_current_pet(Some(id)).await?;
            Ok(format!("Now advising on {}", pet.name))
        }

        Command::History => {
            let profile = advisor.pets().get_current_pet().await?;
            let key = pet_key(profile.as_ref());
            let entries = advisor.history().history(&key).await?;
            let analysis = advisor.patterns(&key).await?;
            Ok(render_history(&entries, &analysis))
        }

        Command::Models => list_models(selector, &cancel).await,

        Command::Help => Ok(HELP.to_string()),
    }
}

/// Query every local candidate for its installed models.
///
/// Unreachable candidates are reported inline rather than failing the command.
async fn list_models(
    selector: &BackendSelector,
    cancel: &CancellationToken,
) -> Result<String, AppError> {
    let mut lines = Vec::new();
    for url in selector.candidates() {
        match selector.local().list_models(url, cancel).await {
            Ok(models) if models.is_empty() => lines.push(format!("{url}: no models installed")),
            Ok(models) => lines.push(format!("{url}: {}", models.join(", "))),
            Err(e) if e.is_cancelled() => return Err(e.into()),
            Err(e) => lines.push(format!("{url}: unavailable ({})", e.detail())),
        }
    }
    if lines.is_empty() {
        lines.push("No local servers configured".to_string());
    }
    lines.push(format!(
        "Cloud fallback: {}",
        if selector.has_cloud() { "enabled" } else { "disabled" }
    ));
    Ok(lines.join("\n"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::backends::{BackendKind, LocalBackend};
    use crate::history::MemoryHistoryStore;
    use crate::storage::SqliteStorage;
    use crate::test_utils::mock_backend_success;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_check_joins_words() {
        assert_eq!(
            Command::parse(&args("check vomiting since   yesterday")).unwrap(),
            Command::Check {
                symptoms: "vomiting since yesterday".into()
            }
        );
    }

    #[test_case("report", ReportType::Comprehensive ; "default type")]
    #[test_case("report basic", ReportType::Basic ; "basic")]
    #[test_case("REPORT Emergency", ReportType::Emergency ; "case insensitive")]
    fn test_parse_report(line: &str, expected: ReportType) {
        assert_eq!(
            Command::parse(&args(line)).unwrap(),
            Command::Report {
                report_type: expected
            }
        );
    }

    #[test]
    fn test_parse_add_pet_multiword_breed() {
        assert_eq!(
            Command::parse(&args("add-pet Rex Golden Retriever 3 male")).unwrap(),
            Command::AddPet {
                pet: NewPet::new("Rex", "Golden Retriever", "3", Gender::Male)
            }
        );
    }

    #[test]
    fn test_parse_add_pet_unknown_gender_is_lenient() {
        let Command::AddPet { pet } = Command::parse(&args("add-pet Mia Siamese 0.5 ?")).unwrap()
        else {
            unreachable!("add-pet parses to AddPet");
        };
        assert_eq!(pet.gender, Gender::Unknown);
    }

    #[test_case("", CommandParseError::MissingCommand ; "empty")]
    #[test_case("fly", CommandParseError::UnknownCommand("fly".into()) ; "unknown")]
    #[test_case("check", CommandParseError::MissingValue("symptoms".into()) ; "check without text")]
    #[test_case("use-pet", CommandParseError::MissingValue("id".into()) ; "use-pet without id")]
    #[test_case("use-pet a b", CommandParseError::UnexpectedArgument("b".into()) ; "use-pet extra")]
    #[test_case("add-pet Rex 3 male", CommandParseError::MissingValue("breed".into()) ; "add-pet without breed")]
    #[test_case("add-pet Rex male", CommandParseError::MissingValue("<name> <breed> <age> <gender>".into()) ; "add-pet too short")]
    fn test_parse_errors(line: &str, expected: CommandParseError) {
        assert_eq!(Command::parse(&args(line)).unwrap_err(), expected);
    }

    #[test]
    fn test_parse_invalid_values() {
        assert!(matches!(
            Command::parse(&args("report weekly")),
            Err(CommandParseError::InvalidValue { arg, .. }) if arg == "report type"
        ));
        assert!(matches!(
            Command::parse(&args("add-pet Rex Beagle old male")),
            Err(CommandParseError::InvalidValue { arg, .. }) if arg == "age"
        ));
    }

    async fn fixture(answer: &str) -> (Advisor<SqliteStorage, MemoryHistoryStore>, BackendSelector) {
        let backend = mock_backend_success(answer, BackendKind::Local);
        let storage = SqliteStorage::new_in_memory().await.unwrap();
        let selector = BackendSelector::new(
            LocalBackend::new("qwen2:1.5b", 500, 1000).unwrap(),
            Vec::new(),
            None,
        );
        (Advisor::new(backend, storage, MemoryHistoryStore::new()), selector)
    }

    async fn run(
        line: &str,
        advisor: &Advisor<SqliteStorage, MemoryHistoryStore>,
        selector: &BackendSelector,
    ) -> Result<String, AppError> {
        let command = Command::parse(&args(line)).unwrap();
        execute(command, advisor, selector, Language::En, CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_pet_commands() {
        let (advisor, selector) = fixture("").await;

        let out = run("add-pet Rex Beagle 3 male", &advisor, &selector)
            .await
            .unwrap();
        assert!(out.contains("Now advising on Rex"));

        let out = run("add-pet Mia Siamese 1 female", &advisor, &selector)
            .await
            .unwrap();
        assert!(!out.contains("Now advising"));

        let mia = advisor.pets().get_all_pets().await.unwrap()[1].id.clone();
        let out = run(&format!("use-pet {mia}"), &advisor, &selector)
            .await
            .unwrap();
        assert_eq!(out, "Now advising on Mia");

        let out = run("pets", &advisor, &selector).await.unwrap();
        assert!(out.contains("* Mia"));
        assert!(out.contains("  Rex"));
    }

    #[tokio::test]
    async fn test_use_unknown_pet() {
        let (advisor, selector) = fixture("").await;
        let err = run("use-pet ghost", &advisor, &selector).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::PetNotFound { .. })));
    }

    #[tokio::test]
    async fn test_report_requires_pet() {
        let (advisor, selector) = fixture("").await;
        let err = run("report", &advisor, &selector).await.unwrap_err();
        assert_eq!(err.user_message(), "Please create a pet profile first");
    }

    #[tokio::test]
    async fn test_check_then_history() {
        let (advisor, selector) = fixture("📋 **SEVERITY ASSESSMENT**\nMild").await;
        run("add-pet Rex Beagle 3 male", &advisor, &selector)
            .await
            .unwrap();

        let out = run("check sneezing a lot", &advisor, &selector)
            .await
            .unwrap();
        assert!(out.contains("MODERATE"));
        assert!(out.contains("Mild"));
        assert!(out.contains("Note: the AI assessed this as"));

        let out = run("history", &advisor, &selector).await.unwrap();
        assert!(out.contains("sneezing a lot"));
        assert!(out.contains("Not enough history"));
    }

    #[tokio::test]
    async fn test_models_without_candidates() {
        let (advisor, selector) = fixture("").await;
        let out = run("models", &advisor, &selector).await.unwrap();
        assert_eq!(out, "No local servers configured\nCloud fallback: disabled");
    }
}
