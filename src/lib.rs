mod answers;
mod capture;
mod config;
mod questions;
mod survey;
mod watchdog;

use answers::{AnswerEntry, AnswerStore};
use capture::{
    Capability, CaptureEvent, RecognitionBridge, WebviewBridge, START_ERROR_MESSAGE,
    UNAVAILABLE_MESSAGE,
};
use config::{AppConfig, SettingsView, UpdateSettingsPayload};
use cpal::traits::{DeviceTrait, HostTrait};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use survey::{AdvanceOutcome, SurveyFlow, SurveyView};
use tauri::{Emitter, Manager, State};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, ShortcutState};
use watchdog::Watchdog;

/// Emitted to the webview whenever survey or capture state changes.
const SURVEY_STATE_EVENT: &str = "survey-state";
const SURVEY_FINISHED_EVENT: &str = "survey-finished";

struct AppState {
    flow: Arc<Mutex<SurveyFlow>>,
    answers: Arc<Mutex<AnswerStore>>,
    bridge: Arc<dyn RecognitionBridge>,
    watchdog: Arc<Watchdog>,
    inactivity_timeout: Arc<Mutex<Duration>>,
    webview_capability: Arc<Mutex<Capability>>,
    hotkey: Arc<Mutex<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MicrophoneInfo {
    available: bool,
    name: Option<String>,
}

fn emit_state(app_handle: &tauri::AppHandle, view: SurveyView) {
    let _ = app_handle.emit(SURVEY_STATE_EVENT, view);
}

fn arm_watchdog(state: &AppState, app_handle: tauri::AppHandle) {
    let delay = state
        .inactivity_timeout
        .lock()
        .map(|d| *d)
        .unwrap_or(Duration::from_secs(config::DEFAULT_INACTIVITY_TIMEOUT_SECS));

    let flow = state.flow.clone();
    let bridge = state.bridge.clone();
    state.watchdog.arm(delay, move || {
        let _ = bridge.stop_session();
        if let Ok(mut flow) = flow.lock() {
            flow.mark_stopped();
            emit_state(&app_handle, flow.state_view());
        }
    });
}

// Shared stop path: explicit stop, finish and settings changes all go through
// here, so the watchdog can never outlive the session it guards.
fn stop_capture(state: &AppState, app_handle: &tauri::AppHandle) {
    state.watchdog.cancel();
    let _ = state.bridge.stop_session();
    if let Ok(mut flow) = state.flow.lock() {
        flow.mark_stopped();
        emit_state(app_handle, flow.state_view());
    }
}

fn register_hotkey(
    app_handle: &tauri::AppHandle,
    state: &AppState,
    hotkey: &str,
) -> Result<(), String> {
    let hotkey = config::normalize_hotkey(hotkey);
    app_handle
        .global_shortcut()
        .unregister_all()
        .map_err(|e| format!("Failed to clear shortcuts: {}", e))?;
    app_handle
        .global_shortcut()
        .register(hotkey.as_str())
        .map_err(|e| format!("Failed to register shortcut '{}': {}", hotkey, e))?;
    if let Ok(mut current) = state.hotkey.lock() {
        *current = hotkey;
    }
    Ok(())
}

fn apply_runtime_config(
    app_handle: &tauri::AppHandle,
    state: &AppState,
    config: &AppConfig,
) -> Result<(), String> {
    if let Ok(mut timeout) = state.inactivity_timeout.lock() {
        *timeout = Duration::from_secs(config::normalize_timeout_secs(
            config.inactivity_timeout_secs,
        ));
    }
    register_hotkey(app_handle, state, &config.hotkey)
}

#[tauri::command]
fn get_survey_state(state: State<'_, AppState>) -> Result<SurveyView, String> {
    let flow = state.flow.lock().map_err(|e| e.to_string())?;
    Ok(flow.state_view())
}

#[tauri::command]
fn start_recording(state: State<'_, AppState>, app_handle: tauri::AppHandle) -> Result<(), String> {
    let capability = {
        let reported = state.webview_capability.lock().map_err(|e| e.to_string())?;
        match *reported {
            Capability::Unavailable => Capability::Unavailable,
            Capability::Available => state.bridge.capability(),
        }
    };

    let mut flow = state.flow.lock().map_err(|e| e.to_string())?;
    if flow.recording() {
        return Ok(());
    }

    if flow.begin(capability).is_err() {
        emit_state(&app_handle, flow.state_view());
        return Err(UNAVAILABLE_MESSAGE.to_string());
    }

    match state.bridge.start_session() {
        Ok(()) => {
            drop(flow);
            arm_watchdog(state.inner(), app_handle);
            Ok(())
        }
        Err(e) => {
            tracing::error!("failed to start recognition session: {}", e);
            flow.mark_start_failed();
            emit_state(&app_handle, flow.state_view());
            Err(START_ERROR_MESSAGE.to_string())
        }
    }
}

#[tauri::command]
fn stop_recording(state: State<'_, AppState>, app_handle: tauri::AppHandle) -> Result<(), String> {
    stop_capture(state.inner(), &app_handle);
    Ok(())
}

#[tauri::command]
fn recognition_event(
    event: CaptureEvent,
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<SurveyView, String> {
    let mut flow = state.flow.lock().map_err(|e| e.to_string())?;
    flow.handle_event(event);
    let view = flow.state_view();
    emit_state(&app_handle, view.clone());
    Ok(view)
}

#[tauri::command]
fn advance_question(
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<AdvanceOutcome, String> {
    let outcome = {
        let mut flow = state.flow.lock().map_err(|e| e.to_string())?;
        let mut answers = state.answers.lock().map_err(|e| e.to_string())?;
        flow.advance(&mut answers)
    };

    if outcome.finished {
        stop_capture(state.inner(), &app_handle);
        let _ = app_handle.emit(SURVEY_FINISHED_EVENT, outcome.clone());
    } else if let Ok(flow) = state.flow.lock() {
        emit_state(&app_handle, flow.state_view());
    }

    Ok(outcome)
}

#[tauri::command]
fn get_answers(state: State<'_, AppState>) -> Result<Vec<AnswerEntry>, String> {
    let answers = state.answers.lock().map_err(|e| e.to_string())?;
    Ok(answers.entries().to_vec())
}

#[tauri::command]
fn report_capability(
    available: bool,
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    {
        let mut capability = state.webview_capability.lock().map_err(|e| e.to_string())?;
        *capability = if available {
            Capability::Available
        } else {
            Capability::Unavailable
        };
    }

    if !available {
        tracing::warn!("webview reported no speech recognition capability");
        let mut flow = state.flow.lock().map_err(|e| e.to_string())?;
        flow.mark_unavailable();
        emit_state(&app_handle, flow.state_view());
    }
    Ok(())
}

#[tauri::command]
fn get_microphone_info() -> Result<MicrophoneInfo, String> {
    let host = cpal::default_host();
    let name = host
        .default_input_device()
        .and_then(|d| d.description().ok().map(|desc| desc.name().to_string()));

    Ok(MicrophoneInfo {
        available: name.is_some(),
        name,
    })
}

#[tauri::command]
fn get_settings(app_handle: tauri::AppHandle) -> Result<SettingsView, String> {
    let config = config::load_or_create(&app_handle)?;
    Ok(config::settings_view(&config))
}

#[tauri::command]
fn update_settings(
    payload: UpdateSettingsPayload,
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
) -> Result<SettingsView, String> {
    stop_capture(state.inner(), &app_handle);
    let config = config::update_settings(&app_handle, payload)?;
    apply_runtime_config(&app_handle, state.inner(), &config)?;
    Ok(config::settings_view(&config))
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, _shortcut, event| {
                    if event.state == ShortcutState::Pressed {
                        if let Some(main_window) = app.get_webview_window("main") {
                            if let Ok(false) = main_window.is_visible() {
                                let _ = main_window.show();
                                let _ = main_window.set_focus();
                            }
                        }
                        let _ = app.emit("toggle-recording", ());
                    }
                })
                .build(),
        )
        .setup(|app| {
            app.manage(AppState {
                flow: Arc::new(Mutex::new(SurveyFlow::new())),
                answers: Arc::new(Mutex::new(AnswerStore::new())),
                bridge: Arc::new(WebviewBridge::new(app.handle().clone())),
                watchdog: Arc::new(Watchdog::new()),
                inactivity_timeout: Arc::new(Mutex::new(Duration::from_secs(
                    config::DEFAULT_INACTIVITY_TIMEOUT_SECS,
                ))),
                webview_capability: Arc::new(Mutex::new(Capability::Available)),
                hotkey: Arc::new(Mutex::new(config::DEFAULT_HOTKEY.to_string())),
            });

            let state = app.state::<AppState>();
            let config = config::load_or_create(&app.handle())?;
            apply_runtime_config(&app.handle(), state.inner(), &config)?;
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_survey_state,
            start_recording,
            stop_recording,
            recognition_event,
            advance_question,
            get_answers,
            report_capability,
            get_microphone_info,
            get_settings,
            update_settings
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
