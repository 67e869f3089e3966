//! Line-oriented console front-end
//!
//! Parses one command per line, applies it to the [`EmergencyApp`] and
//! renders the active screen as text.

use std::fmt::Write as _;

use anyhow::{Context, anyhow};
use thiserror::Error;

use crate::models::{
    ContactField, HospitalField, MedicationField, ProfileField, Record,
};
use crate::services::{EditorKind, Editor, EmergencyApp, Screen};

/// Console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sos { silent: bool },
    Edit(EditorKind),
    Add,
    Set { index: usize, field: String, value: String },
    Remove(usize),
    Field { field: ProfileField, value: String },
    Save,
    Cancel,
    Describe(String),
    Submit,
    Skip,
    Call,
    Continue,
    Done,
    State,
    Metrics,
    Help,
    Quit,
}

/// Command parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument { command: String, argument: String },

    #[error("invalid index '{0}'")]
    InvalidIndex(String),

    #[error("{0}")]
    InvalidArgument(String),
}

pub const HELP: &str = "\
dashboard:  sos | silent | edit profile|hospitals|medications
editors:    add | set <index> <field> <value> | remove <index> | field <name> <value> | save | cancel
emergency:  describe <text> | submit | skip | call | continue | done
other:      state | metrics | help | quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "sos" => Command::Sos { silent: false },
            "silent" => Command::Sos { silent: true },
            "edit" => {
                let kind = required(head, rest, "an editor name")?;
                Command::Edit(kind.parse().map_err(CommandError::InvalidArgument)?)
            }
            "add" => Command::Add,
            "set" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let index = parse_index(parts.next().unwrap_or(""))?;
                let field = parts.next().filter(|f| !f.is_empty()).ok_or_else(|| missing(head, "a field"))?;
                Command::Set {
                    index,
                    field: field.to_string(),
                    value: parts.next().unwrap_or("").trim().to_string(),
                }
            }
            "remove" => Command::Remove(parse_index(rest)?),
            "field" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field = required(head, field, "a profile field")?;
                Command::Field {
                    field: field.parse().map_err(CommandError::InvalidArgument)?,
                    value: value.trim().to_string(),
                }
            }
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "describe" => Command::Describe(rest.to_string()),
            "submit" => Command::Submit,
            "skip" => Command::Skip,
            "call" => Command::Call,
            "continue" => Command::Continue,
            "done" | "return" => Command::Done,
            "state" => Command::State,
            "metrics" => Command::Metrics,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn missing(command: &str, argument: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        argument: argument.to_string(),
    }
}

fn required<'a>(command: &str, value: &'a str, argument: &str) -> Result<&'a str, CommandError> {
    if value.is_empty() {
        Err(missing(command, argument))
    } else {
        Ok(value)
    }
}

fn parse_index(value: &str) -> Result<usize, CommandError> {
    value
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidIndex(value.to_string()))
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep running, optionally printing a message
    Continue(Option<String>),
    Quit,
}

/// Apply a command; the caller drains the event queue afterwards
pub fn execute(app: &mut EmergencyApp, command: Command) -> anyhow::Result<Outcome> {
    let message = match command {
        Command::Quit => return Ok(Outcome::Quit),
        Command::Help => Some(HELP.to_string()),
        Command::State => Some(serde_json::to_string_pretty(app.state())?),
        Command::Metrics => Some(app.metrics().gather()),
        Command::Sos { silent } => {
            app.dashboard()?.trigger_sos(silent);
            None
        }
        Command::Edit(kind) => {
            app.dashboard()?.edit(kind);
            None
        }
        Command::Add => {
            let id = match app.screen().editor_kind() {
                Some(EditorKind::Profile) => app.profile_editor()?.add_contact()?,
                Some(EditorKind::Hospitals) => app.hospitals_editor()?.add_item()?,
                Some(EditorKind::Medications) => app.medications_editor()?.add_item()?,
                None => return Err(anyhow!("'add' only works in an editor")),
            };
            Some(format!("added {}", id))
        }
        Command::Set { index, field, value } => {
            match app.screen().editor_kind() {
                Some(EditorKind::Profile) => {
                    let field: ContactField = field.parse().map_err(anyhow::Error::msg)?;
                    app.profile_editor()?.update_contact(index, field, value)?;
                }
                Some(EditorKind::Hospitals) => {
                    let field: HospitalField = field.parse().map_err(anyhow::Error::msg)?;
                    app.hospitals_editor()?.update_field(index, field, value)?;
                }
                Some(EditorKind::Medications) => {
                    let field: MedicationField = field.parse().map_err(anyhow::Error::msg)?;
                    app.medications_editor()?.update_field(index, field, value)?;
                }
                None => return Err(anyhow!("'set' only works in an editor")),
            }
            None
        }
        Command::Remove(index) => {
            match app.screen().editor_kind() {
                Some(EditorKind::Profile) => {
                    app.profile_editor()?.remove_contact(index)?;
                }
                Some(EditorKind::Hospitals) => {
                    app.hospitals_editor()?.remove_item(index)?;
                }
                Some(EditorKind::Medications) => {
                    app.medications_editor()?.remove_item(index)?;
                }
                None => return Err(anyhow!("'remove' only works in an editor")),
            }
            None
        }
        Command::Field { field, value } => {
            app.profile_editor()?.set_field(field, value)?;
            None
        }
        Command::Save => {
            open_editor(app)?.submit().context("cannot save")?;
            None
        }
        Command::Cancel => {
            open_editor(app)?.cancel()?;
            None
        }
        Command::Describe(text) => {
            app.wizard()?.set_symptoms(text)?;
            None
        }
        Command::Submit => {
            app.wizard()?.submit_symptoms()?;
            None
        }
        Command::Skip => {
            app.wizard()?.skip()?;
            None
        }
        Command::Call => Some(app.wizard()?.call_emergency_services()?),
        Command::Continue => {
            app.wizard()?.continue_to_summary()?;
            None
        }
        Command::Done => {
            app.wizard()?.complete()?;
            None
        }
    };
    Ok(Outcome::Continue(message))
}

fn open_editor(app: &mut EmergencyApp) -> anyhow::Result<&mut dyn Editor> {
    let editor: &mut dyn Editor = match app.screen().editor_kind() {
        Some(EditorKind::Profile) => app.profile_editor()? as &mut dyn Editor,
        Some(EditorKind::Hospitals) => app.hospitals_editor()? as &mut dyn Editor,
        Some(EditorKind::Medications) => app.medications_editor()? as &mut dyn Editor,
        None => return Err(anyhow!("no editor is open")),
    };
    Ok(editor)
}

/// Render the active screen
pub fn render(app: &EmergencyApp) -> String {
    let mut out = String::new();
    match app.screen() {
        Screen::Dashboard => match app.dashboard() {
            Ok(dashboard) => out.push_str(&dashboard.view().to_string()),
            Err(e) => out.push_str(&e.to_string()),
        },
        Screen::ProfileEditor(editor) => {
            let draft = editor.draft();
            let _ = writeln!(out, "Edit Profile");
            for field in [ProfileField::Name, ProfileField::Address, ProfileField::MedicalInfo] {
                let _ = writeln!(out, "  {}: {}", field, draft.field(field));
            }
            let _ = writeln!(out, "  Emergency Contacts");
            render_rows(&mut out, &draft.emergency_contacts, &[ContactField::Name, ContactField::Phone, ContactField::Email]);
        }
        Screen::HospitalsEditor(editor) => {
            let _ = writeln!(out, "Preferred Hospitals");
            render_rows(&mut out, editor.items(), &[HospitalField::Name, HospitalField::Address]);
        }
        Screen::MedicationsEditor(editor) => {
            let _ = writeln!(out, "Medications");
            render_rows(
                &mut out,
                editor.items(),
                &[MedicationField::Name, MedicationField::Dosage, MedicationField::Schedule],
            );
        }
        Screen::Emergency(wizard) => out.push_str(&wizard.screen().to_string()),
    }
    out
}

fn render_rows<T: Record>(out: &mut String, items: &[T], fields: &[T::Field]) {
    for (index, item) in items.iter().enumerate() {
        let cells: Vec<String> = fields
            .iter()
            .map(|&field| format!("{}={:?}", field, item.field(field)))
            .collect();
        let _ = writeln!(out, "    [{}] {}", index, cells.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::AppState;
    use rstest::rstest;

    #[rstest]
    #[case("sos", Command::Sos { silent: false })]
    #[case("  SILENT ", Command::Sos { silent: true })]
    #[case("edit hospitals", Command::Edit(EditorKind::Hospitals))]
    #[case("remove 2", Command::Remove(2))]
    #[case("describe chest pain and dizziness", Command::Describe("chest pain and dizziness".into()))]
    #[case("done", Command::Done)]
    fn test_parse(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(Command::parse(line), Ok(expected));
    }

    #[test]
    fn test_parse_set_keeps_spaces_in_value() {
        assert_eq!(
            Command::parse("set 1 address 9 Shore Road, Apt 4"),
            Ok(Command::Set {
                index: 1,
                field: "address".into(),
                value: "9 Shore Road, Apt 4".into(),
            })
        );
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            Command::parse("field medicalInfo Asthma"),
            Ok(Command::Field {
                field: ProfileField::MedicalInfo,
                value: "Asthma".into(),
            })
        );
    }

    #[rstest]
    #[case("", CommandError::Empty)]
    #[case("dance", CommandError::Unknown("dance".into()))]
    #[case("remove x", CommandError::InvalidIndex("x".into()))]
    #[case("edit", CommandError::MissingArgument { command: "edit".into(), argument: "an editor name".into() })]
    fn test_parse_errors(#[case] line: &str, #[case] expected: CommandError) {
        assert_eq!(Command::parse(line), Err(expected));
    }

    #[tokio::test]
    async fn test_execute_edit_flow() {
        let (mut app, mut events) = EmergencyApp::new(AppConfig::development(), AppState::sample());

        for line in ["edit medications", "add", "set 2 name Aspirin", "set 2 dosage 81mg"] {
            execute(&mut app, Command::parse(line).unwrap()).unwrap();
            app.drain(&mut events).unwrap();
        }
        assert!(render(&app).contains("name=\"Aspirin\""));

        // schedule still empty
        assert!(execute(&mut app, Command::Save).is_err());
        execute(&mut app, Command::parse("set 2 schedule Daily").unwrap()).unwrap();
        execute(&mut app, Command::Save).unwrap();
        app.drain(&mut events).unwrap();

        assert!(app.screen().is_dashboard());
        assert_eq!(app.state().medications[2].name, "Aspirin");
        assert!(render(&app).contains("Aspirin (81mg - Daily)"));
    }

    #[tokio::test]
    async fn test_execute_rejects_wrong_screen() {
        let (mut app, _events) = EmergencyApp::new(AppConfig::development(), AppState::sample());
        assert!(execute(&mut app, Command::Skip).is_err());
        assert!(execute(&mut app, Command::Add).is_err());
        assert_eq!(execute(&mut app, Command::Quit).unwrap(), Outcome::Quit);
    }
}
