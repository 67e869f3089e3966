// End-to-end flows through the application host
//
// Tests cover:
// - Silent SOS, skip and return to the dashboard
// - Loud SOS through analysis with no hospitals configured
// - Editor save and cancel round trips
// - Console commands driving the same flows

use std::sync::atomic::Ordering;
use std::time::Duration;

use lifeline::config::AppConfig;
use lifeline::console::{self, Command};
use lifeline::error::AppError;
use lifeline::models::{AppState, HospitalField, ProfileField, UserProfile};
use lifeline::services::{
    AppEvent, Editor, EmergencyApp, EventReceiver, Screen, WizardScreen, WizardStep,
};

/// Wait for the next timer event and apply it
async fn fire_next_timer(app: &mut EmergencyApp, events: &mut EventReceiver) {
    let event = events.recv().await.expect("event queue closed");
    assert!(matches!(event, AppEvent::TimerElapsed(_)), "unexpected event {:?}", event);
    app.dispatch(event).unwrap();
}

fn step(app: &mut EmergencyApp) -> WizardStep {
    app.wizard().unwrap().step()
}

#[tokio::test(start_paused = true)]
async fn test_silent_sos_skip_returns_to_dashboard() {
    let (mut app, mut events) = EmergencyApp::new(AppConfig::development(), AppState::sample());
    let before = app.state().clone();

    app.dashboard().unwrap().trigger_sos(true);
    app.drain(&mut events).unwrap();

    match app.wizard().unwrap().screen() {
        WizardScreen::Activated { title, .. } => assert_eq!(title, "Silent Emergency Activated"),
        other => panic!("expected Activated, got {:?}", other),
    }

    fire_next_timer(&mut app, &mut events).await;
    assert_eq!(step(&mut app), WizardStep::Describe);

    app.wizard().unwrap().skip().unwrap();
    match app.wizard().unwrap().screen() {
        WizardScreen::Summary(summary) => {
            assert_eq!(summary.name, "Alex Morgan");
            assert_eq!(summary.contacts.len(), 2);
            assert_eq!(summary.medications.len(), 2);
        }
        other => panic!("expected Summary, got {:?}", other),
    }

    app.wizard().unwrap().complete().unwrap();
    app.drain(&mut events).unwrap();

    assert!(app.screen().is_dashboard());
    assert_eq!(app.state(), &before);
    assert_eq!(app.metrics().sos_silent_total.load(Ordering::SeqCst), 1);
    assert_eq!(app.metrics().wizards_completed_total.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_loud_sos_analysis_without_hospitals() {
    let profile = UserProfile::new("Sam Rivera", "1 Elm Court", "Asthma");
    let (mut app, mut events) =
        EmergencyApp::new(AppConfig::development(), AppState::new(profile, vec![], vec![]));

    app.dashboard().unwrap().trigger_sos(false);
    app.drain(&mut events).unwrap();
    fire_next_timer(&mut app, &mut events).await;

    let wizard = app.wizard().unwrap();
    assert!(!wizard.can_submit());
    wizard.set_symptoms("short of breath").unwrap();
    wizard.submit_symptoms().unwrap();
    assert!(wizard.is_processing());

    fire_next_timer(&mut app, &mut events).await;
    match app.wizard().unwrap().screen() {
        WizardScreen::Analysis {
            severity,
            nearest_hospital,
            department,
            ..
        } => {
            assert_eq!(severity, "Moderate");
            assert_eq!(department, "Emergency Room");
            assert_eq!(nearest_hospital, "No hospitals configured");
        }
        other => panic!("expected Analysis, got {:?}", other),
    }

    let ack = app.wizard().unwrap().call_emergency_services().unwrap();
    assert_eq!(ack, "Emergency services have been notified!");
    assert_eq!(step(&mut app), WizardStep::Summary);

    app.wizard().unwrap().complete().unwrap();
    assert!(matches!(
        app.wizard().unwrap().complete(),
        Err(AppError::AlreadyCompleted)
    ));
    app.drain(&mut events).unwrap();
    assert!(app.screen().is_dashboard());
    assert_eq!(app.metrics().sos_loud_total.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completed_wizard_timers_never_fire() {
    let (mut app, mut events) = EmergencyApp::new(AppConfig::development(), AppState::sample());

    app.dashboard().unwrap().trigger_sos(false);
    app.drain(&mut events).unwrap();
    fire_next_timer(&mut app, &mut events).await;

    let wizard = app.wizard().unwrap();
    wizard.set_symptoms("fell down the stairs").unwrap();
    wizard.submit_symptoms().unwrap();
    // skipping drops the pending analysis timer
    wizard.skip().unwrap();
    wizard.complete().unwrap();
    app.drain(&mut events).unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(app.drain(&mut events).unwrap(), 0);
    assert!(app.screen().is_dashboard());
}

#[tokio::test]
async fn test_hospital_edit_saves_and_cancel_discards() {
    let (mut app, mut events) = EmergencyApp::new(AppConfig::development(), AppState::sample());

    app.dashboard().unwrap().edit_hospitals();
    app.drain(&mut events).unwrap();
    assert!(matches!(app.screen(), Screen::HospitalsEditor(_)));

    let editor = app.hospitals_editor().unwrap();
    editor.remove_item(0).unwrap();
    editor.update_field(0, HospitalField::Name, "Harbor Clinic").unwrap();
    editor.submit().unwrap();
    app.drain(&mut events).unwrap();

    assert!(app.screen().is_dashboard());
    assert_eq!(app.state().hospitals.len(), 3);
    assert_eq!(app.state().nearest_hospital(), Some("Harbor Clinic"));

    app.dashboard().unwrap().edit_profile();
    app.drain(&mut events).unwrap();
    let editor = app.profile_editor().unwrap();
    editor.set_field(ProfileField::Name, "").unwrap();
    editor.cancel().unwrap();
    app.drain(&mut events).unwrap();

    assert!(app.screen().is_dashboard());
    assert_eq!(app.state().profile.name, "Alex Morgan");
    assert_eq!(app.metrics().edits_cancelled_total.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_console_drives_emergency_flow() {
    let (mut app, mut events) = EmergencyApp::new(AppConfig::development(), AppState::sample());

    console::execute(&mut app, Command::parse("sos").unwrap()).unwrap();
    app.drain(&mut events).unwrap();
    assert!(console::render(&app).contains("Emergency SOS Activated"));

    fire_next_timer(&mut app, &mut events).await;
    for line in ["describe chest pain", "submit"] {
        console::execute(&mut app, Command::parse(line).unwrap()).unwrap();
    }
    assert!(console::render(&app).contains("Analyzing..."));

    fire_next_timer(&mut app, &mut events).await;
    assert!(console::render(&app).contains("Springfield General Hospital"));

    for line in ["continue", "done"] {
        console::execute(&mut app, Command::parse(line).unwrap()).unwrap();
    }
    app.drain(&mut events).unwrap();
    assert!(app.screen().is_dashboard());
}
