use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;

pub fn render_customers_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.customers.len());
    let slice = &app.customers[start..end];

    let rows = slice.iter().enumerate().map(|(i, c)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(c.name.clone()),
            Cell::from(c.email.clone()),
            Cell::from(c.phone.clone()),
            Cell::from(c.address.city.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(34),
        Constraint::Percentage(20),
        Constraint::Percentage(18),
    ];

    let header = Row::new(vec!["NAME", "EMAIL", "PHONE", "CITY"]).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Customer List")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_customer_details(f: &mut Frame, area: Rect, app: &AppState) {
    let (text, color) = match app.selected_customer() {
        Some(c) => {
            let image = c.image_url.as_deref().unwrap_or("-");
            let video = c.video_url.as_deref().unwrap_or("-");
            let body = format!(
                "Name: {}\nEmail: {}\nPhone: {}\nAddress: {}, {}, {}\nImage: {}\nVideo: {}",
                c.name, c.email, c.phone, c.address.city, c.address.state, c.address.country, image, video
            );
            (body, app.theme.text)
        }
        None => ("No customers yet".to_string(), app.theme.muted),
    };
    let p = Paragraph::new(text).style(Style::default().fg(color)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
