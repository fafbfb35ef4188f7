use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Focus, InputMode, Mode};
use crate::form::{FormField, MediaFile};
use crate::ui::components::format_bytes;

/// Render the form pane: one row per field, inline errors underneath the
/// offending row, and the submit row reflecting the in-flight state.
pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.mode {
        Mode::Create => "Create Customer",
        Mode::Edit { .. } => "Update Customer",
    };

    let mut lines: Vec<Line> = Vec::new();
    for field in FormField::ALL {
        let focused = app.focus == Focus::Form && app.focused_field == field;
        let marker = if focused { "▶ " } else { "  " };
        let editing = focused && app.input_mode == InputMode::EditField;

        let value = match field {
            FormField::Name => text_value(&app.form.name, editing),
            FormField::Email => text_value(&app.form.email, editing),
            FormField::Phone => text_value(&app.form.phone, editing),
            FormField::City => select_value(app.form.city.as_str()),
            FormField::State => select_value(app.form.state.as_str()),
            FormField::Country => select_value(app.form.country.as_str()),
            FormField::Image => media_value(app.form.image.as_ref()),
            FormField::Video => media_value(app.form.video.as_ref()),
            FormField::Terms => {
                if app.form.terms_accepted { "[x]".to_string() } else { "[ ]".to_string() }
            }
            FormField::Submit => {
                if app.submit_in_flight { "[ Saving... ]".to_string() } else { "[ Submit ]".to_string() }
            }
        };

        let row_style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let line = match field {
            FormField::Terms => Line::from(Span::styled(
                format!("{marker}{value} {}", field.label()),
                row_style,
            )),
            FormField::Submit => Line::from(Span::styled(format!("{marker}{value}"), row_style)),
            _ => Line::from(Span::styled(
                format!("{marker}{}: {value}", field.label()),
                row_style,
            )),
        };
        lines.push(line);

        if let Some(err) = app.errors.iter().find(|e| e.field == field) {
            lines.push(Line::from(Span::styled(
                format!("    {}", err.message),
                Style::default().fg(app.theme.error),
            )));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

fn text_value(value: &str, editing: bool) -> String {
    if editing {
        format!("{value}_")
    } else {
        value.to_string()
    }
}

fn select_value(value: &str) -> String {
    format!("◂ {value} ▸")
}

fn media_value(media: Option<&MediaFile>) -> String {
    match media {
        Some(m) => format!("{} ({})", m.file_name, format_bytes(m.bytes.len() as u64)),
        None => "none".to_string(),
    }
}
