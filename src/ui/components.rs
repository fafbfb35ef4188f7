//! Shared UI components (status bar, modal helpers, media preview).
//!
//! Contains small building blocks reused across the form and list panes.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, ModalState};
use crate::form::MediaKind;

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::EditField => "EDIT",
        InputMode::Modal => "MODAL",
    };
    let mut chips = Vec::new();
    if app.submit_in_flight {
        chips.push("saving");
    }
    if app.fetches_in_flight > 0 {
        chips.push("fetching");
    }
    let chips_str = if chips.is_empty() {
        String::new()
    } else {
        format!("  busy:[{}]", chips.join(","))
    };
    let msg = format!(
        "mode: {mode}  customers:{}  rows/page:{}  up:{}s{}",
        app.customers.len(),
        app.rows_per_page,
        app.started_at.elapsed().as_secs(),
        chips_str
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        // Compute a sensible max width and height; wrap long text
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 40u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the file path prompt for attaching an image or video.
pub fn render_path_input_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::PathInput { kind, value } = state {
        let width = 60u16.min(area.width.saturating_sub(4)).max(40);
        let rect = centered_rect(width, 7, area);
        let title = match kind {
            MediaKind::Image => "Attach image (max 5MB)",
            MediaKind::Video => "Attach video (max 15MB)",
        };
        let body = format!("Path to file:\n{}_\n\nEnter: load; Esc: cancel", value);
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the local media preview pane for attached files.
///
/// The preview reflects the form's attachments only; it never waits on, or
/// changes with, the server round trip.
pub fn render_preview(f: &mut Frame, area: Rect, app: &AppState) {
    let mut body = String::new();
    for media in [app.form.image.as_ref(), app.form.video.as_ref()].into_iter().flatten() {
        let format = media.sniffed_format().unwrap_or("unknown format");
        body.push_str(&format!(
            "{}: {} — {} ({})\n",
            media.kind.label(),
            media.file_name,
            format,
            format_bytes(media.bytes.len() as u64),
        ));
    }
    let p = Paragraph::new(body)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Preview")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// Human-readable byte count for file rows and the preview pane.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
