// ============================================================================
// Deposit screen: addresses and EUR bank details
// ============================================================================
// Shows the publicly configured deposit addresses (managed by the back
// office) plus the per-user EUR bank details when the profile carries them.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let has_eur_details = app
        .profile
        .as_ref()
        .is_some_and(|p| p.details_eur.is_some());

    if has_eur_details {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        render_addresses(frame, app, chunks[0]);
        render_eur_details(frame, app, chunks[1]);
    } else {
        render_addresses(frame, app, area);
    }
}

fn render_addresses(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Deposit Addresses ");

    if app.deposit_addresses.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No deposit addresses available",
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .deposit_addresses
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let line = format!(
                " {:<8} {:<10} {}",
                row.label, row.network, row.address
            );

            let mut item = ListItem::new(line).style(Style::default().fg(Color::White));
            if index == app.selected_index {
                item = item.style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }
            item
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn render_eur_details(frame: &mut Frame, app: &App, area: Rect) {
    let details = match app.profile.as_ref().and_then(|p| p.details_eur.as_ref()) {
        Some(details) => details,
        None => return,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" EUR Bank Transfer ");

    let label_style = Style::default().fg(Color::Gray);
    let text = vec![
        Line::from(vec![
            Span::styled("Beneficiary  ", label_style),
            Span::raw(details.label.clone()),
        ]),
        Line::from(vec![
            Span::styled("Details      ", label_style),
            Span::raw(details.number_details.clone()),
        ]),
        Line::from(vec![
            Span::styled("Reference    ", label_style),
            Span::raw(details.description.clone()),
        ]),
    ];

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
