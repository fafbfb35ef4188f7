pub mod components;
pub mod form;
pub mod list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState, Mode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(root[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(8)].as_ref())
        .split(body[1]);

    let mode_label = match app.mode {
        Mode::Create => "Create Customer",
        Mode::Edit { .. } => "Update Customer",
    };
    let p = Paragraph::new(format!(
        "customer-manager  [{mode_label}]  customers:{}  — Tab: switch pane; Enter: edit/apply; n: new; d: delete; r: refresh; q: quit",
        app.customers.len()
    ))
    .block(
        Block::default()
            .title("customer-manager")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    form::render_form(f, body[0], app);
    list::render_customers_table(f, right[0], app);

    // The bottom-right pane doubles as media preview once a file is attached.
    if app.form.image.is_some() || app.form.video.is_some() {
        components::render_preview(f, right[1], app);
    } else {
        list::render_customer_details(f, right[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match state {
            ModalState::Info { .. } => {
                components::render_info_modal(f, area, app, &state);
            }
            ModalState::PathInput { .. } => {
                components::render_path_input_modal(f, area, app, &state);
            }
        }
    }
}
