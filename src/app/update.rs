use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::{ApiClient, SavePayload};
use crate::app::{ApiEvent, AppState, Command, Focus, InputMode, ModalState, Mode, Theme};
use crate::form::{self, FormField, FormState, MediaKind};
use crate::ui;

/// Launches API tasks on the runtime owned by `main`.
pub struct Dispatcher {
    pub handle: tokio::runtime::Handle,
    pub client: Arc<ApiClient>,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    dispatcher: &Dispatcher,
    theme: Theme,
) -> Result<()> {
    let mut app = AppState::new(theme);
    let (tx, rx) = mpsc::channel();

    // Initial list load; everything after this is user-driven.
    dispatch(&mut app, dispatcher, &tx, Command::Fetch);

    loop {
        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        // Drain completed API tasks before blocking on input again. Follow-up
        // commands (the re-fetch after a successful mutation) dispatch here.
        while let Ok(api_event) = rx.try_recv() {
            if let Some(cmd) = apply_api_event(&mut app, api_event) {
                dispatch(&mut app, dispatcher, &tx, cmd);
            }
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(&mut app, key.code) {
                        Some(Command::Quit) => break,
                        Some(cmd) => dispatch(&mut app, dispatcher, &tx, cmd),
                        None => {}
                    }
                }
            }
        }
    }

    Ok(())
}

/// Spawn the task for a command and record what is now in flight.
fn dispatch(app: &mut AppState, dispatcher: &Dispatcher, tx: &Sender<ApiEvent>, cmd: Command) {
    match cmd {
        Command::Fetch => {
            app.fetches_in_flight += 1;
            let client = dispatcher.client.clone();
            let tx = tx.clone();
            dispatcher.handle.spawn(async move {
                let _ = tx.send(ApiEvent::Fetched(client.fetch_all().await));
            });
        }
        Command::Save { mode, payload } => {
            app.submit_in_flight = true;
            let client = dispatcher.client.clone();
            let tx = tx.clone();
            dispatcher.handle.spawn(async move {
                let result = match &mode {
                    Mode::Create => client.create(&payload).await,
                    Mode::Edit { id } => client.update(id, &payload).await,
                };
                let _ = tx.send(ApiEvent::Saved(result));
            });
        }
        Command::Delete { id } => {
            let client = dispatcher.client.clone();
            let tx = tx.clone();
            dispatcher.handle.spawn(async move {
                let _ = tx.send(ApiEvent::Deleted(client.delete(&id).await));
            });
        }
        Command::Quit => {}
    }
}

/// Fold one API completion into the state. Returns the follow-up command the
/// loop must dispatch, if any.
pub fn apply_api_event(app: &mut AppState, api_event: ApiEvent) -> Option<Command> {
    match api_event {
        ApiEvent::Fetched(Ok(customers)) => {
            // Overlapping fetches are neither deduplicated nor cancelled;
            // whichever response lands last wins.
            app.fetches_in_flight = app.fetches_in_flight.saturating_sub(1);
            app.customers = customers;
            app.selected_index = app.selected_index.min(app.customers.len().saturating_sub(1));
            None
        }
        ApiEvent::Fetched(Err(err)) => {
            app.fetches_in_flight = app.fetches_in_flight.saturating_sub(1);
            error!(%err, "fetching customers failed");
            open_modal(app, ModalState::Info {
                message: format!("Error fetching customers: {err}"),
            });
            None
        }
        ApiEvent::Saved(Ok(customer)) => {
            app.submit_in_flight = false;
            info!(id = %customer.id, "customer saved");
            let message = match app.mode {
                Mode::Create => "Customer created successfully!",
                Mode::Edit { .. } => "Customer updated successfully!",
            };
            app.mode = Mode::Create;
            app.form.reset();
            app.errors.clear();
            open_modal(app, ModalState::Info {
                message: message.to_string(),
            });
            Some(Command::Fetch)
        }
        ApiEvent::Saved(Err(err)) => {
            // Form contents (and the edit selection) stay as they were.
            app.submit_in_flight = false;
            error!(%err, "saving customer failed");
            open_modal(app, ModalState::Info {
                message: format!("Error saving customer: {err}"),
            });
            None
        }
        ApiEvent::Deleted(Ok(())) => {
            info!("customer deleted");
            open_modal(app, ModalState::Info {
                message: "Customer deleted successfully!".to_string(),
            });
            Some(Command::Fetch)
        }
        ApiEvent::Deleted(Err(err)) => {
            error!(%err, "deleting customer failed");
            open_modal(app, ModalState::Info {
                message: format!("Error deleting customer: {err}"),
            });
            None
        }
    }
}

/// Translate a key press into state changes and an optional command.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> Option<Command> {
    match app.input_mode {
        InputMode::Modal => handle_modal_key(app, code),
        InputMode::EditField => {
            handle_text_entry(app, code);
            None
        }
        InputMode::Normal => match app.focus {
            Focus::List => handle_list_key(app, code),
            Focus::Form => handle_form_key(app, code),
        },
    }
}

fn handle_list_key(app: &mut AppState, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') => return Some(Command::Quit),
        KeyCode::Tab | KeyCode::Esc => {
            app.focus = Focus::Form;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected_index + 1 < app.customers.len() {
                app.selected_index += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let rpp = app.rows_per_page.max(1);
            app.selected_index = app.selected_index.saturating_sub(rpp);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let new_idx = app.selected_index.saturating_add(app.rows_per_page.max(1));
            app.selected_index = new_idx.min(app.customers.len().saturating_sub(1));
        }
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some(customer) = app.selected_customer() {
                let id = customer.id.clone();
                let form = FormState::prefill(customer);
                app.mode = Mode::Edit { id };
                app.form = form;
                app.errors.clear();
                app.focus = Focus::Form;
                app.focused_field = FormField::Name;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            // No confirmation step and no undo.
            if let Some(customer) = app.selected_customer() {
                return Some(Command::Delete {
                    id: customer.id.clone(),
                });
            }
        }
        KeyCode::Char('n') => {
            app.mode = Mode::Create;
            app.form.reset();
            app.errors.clear();
            app.focus = Focus::Form;
            app.focused_field = FormField::Name;
        }
        KeyCode::Char('r') => return Some(Command::Fetch),
        _ => {}
    }
    None
}

fn handle_form_key(app: &mut AppState, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') => return Some(Command::Quit),
        KeyCode::Tab | KeyCode::Esc => {
            app.focus = Focus::List;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.focused_field = app.focused_field.prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.focused_field = app.focused_field.next();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            cycle_select(app, -1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            cycle_select(app, 1);
        }
        KeyCode::Char(' ') => {
            if app.focused_field == FormField::Terms {
                app.form.terms_accepted = !app.form.terms_accepted;
                revalidate_shown_errors(app);
            }
        }
        KeyCode::Backspace | KeyCode::Delete => match app.focused_field {
            FormField::Image => app.form.image = None,
            FormField::Video => app.form.video = None,
            _ => {}
        },
        KeyCode::Enter => match app.focused_field {
            FormField::Terms => {
                app.form.terms_accepted = !app.form.terms_accepted;
                revalidate_shown_errors(app);
            }
            FormField::Image => {
                open_modal(app, ModalState::PathInput {
                    kind: MediaKind::Image,
                    value: String::new(),
                });
            }
            FormField::Video => {
                open_modal(app, ModalState::PathInput {
                    kind: MediaKind::Video,
                    value: String::new(),
                });
            }
            FormField::Submit => return try_submit(app),
            field if field.is_text() => {
                app.input_mode = InputMode::EditField;
            }
            field if field.is_select() => {
                cycle_select(app, 1);
            }
            _ => {}
        },
        _ => {}
    }
    None
}

/// Validate and, if clean, detach a payload for dispatch. Ignored entirely
/// while a submission is already in flight.
fn try_submit(app: &mut AppState) -> Option<Command> {
    if app.submit_in_flight {
        return None;
    }
    app.errors = form::validate(&app.form);
    if !app.errors.is_empty() {
        warn!(count = app.errors.len(), "submission blocked by validation");
        return None;
    }
    Some(Command::Save {
        mode: app.mode.clone(),
        payload: SavePayload::from_form(&app.form),
    })
}

fn handle_text_entry(app: &mut AppState, code: KeyCode) {
    let buffer = match app.focused_field {
        FormField::Name => &mut app.form.name,
        FormField::Email => &mut app.form.email,
        FormField::Phone => &mut app.form.phone,
        // Only text rows enter EditField mode.
        _ => {
            app.input_mode = InputMode::Normal;
            return;
        }
    };
    match code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            revalidate_shown_errors(app);
        }
        KeyCode::Backspace => {
            buffer.pop();
            revalidate_shown_errors(app);
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            revalidate_shown_errors(app);
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) -> Option<Command> {
    match &mut app.modal {
        Some(ModalState::Info { .. }) => match code {
            KeyCode::Esc | KeyCode::Enter => close_modal(app),
            _ => {}
        },
        Some(ModalState::PathInput { kind, value }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char(c) => {
                value.push(c);
            }
            KeyCode::Enter => {
                let kind = *kind;
                let path = value.clone();
                attach_media(app, kind, &path);
            }
            _ => {}
        },
        None => {}
    }
    None
}

/// Load a file into the form; size ceilings are enforced here, before any
/// request exists. The preview pane reflects the attachment immediately.
fn attach_media(app: &mut AppState, kind: MediaKind, path: &str) {
    match form::load_media(Path::new(path.trim()), kind) {
        Ok(media) => {
            info!(kind = kind.label(), file = %media.file_name, bytes = media.bytes.len(), "attached media");
            match kind {
                MediaKind::Image => app.form.image = Some(media),
                MediaKind::Video => app.form.video = Some(media),
            }
            close_modal(app);
        }
        Err(err) => {
            warn!(%err, "media rejected");
            open_modal(app, ModalState::Info {
                message: err.to_string(),
            });
        }
    }
}

fn cycle_select(app: &mut AppState, step: isize) {
    match app.focused_field {
        FormField::City => {
            app.form.city = if step >= 0 { app.form.city.next() } else { app.form.city.prev() };
        }
        FormField::State => {
            app.form.state = if step >= 0 { app.form.state.next() } else { app.form.state.prev() };
        }
        FormField::Country => {
            app.form.country = if step >= 0 { app.form.country.next() } else { app.form.country.prev() };
        }
        _ => {}
    }
}

/// Keep inline errors honest while the user fixes fields, without showing
/// errors before the first submit attempt.
fn revalidate_shown_errors(app: &mut AppState) {
    if !app.errors.is_empty() {
        app.errors = form::validate(&app.form);
    }
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
