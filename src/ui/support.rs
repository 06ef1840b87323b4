// ============================================================================
// Support screen: message to the operators
// ============================================================================
// A single free-text message, relayed through the same mail endpoint the
// transfer pipeline uses.
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_account(frame, app, chunks[0]);
    render_message_input(frame, app, chunks[1]);
}

fn render_account(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Your Account ");

    let label_style = Style::default().fg(Color::Gray);
    let text = match &app.profile {
        Some(profile) => vec![
            Line::from(vec![
                Span::styled("Email       ", label_style),
                Span::raw(profile.email.clone()),
            ]),
            Line::from(vec![
                Span::styled("Account ID  ", label_style),
                Span::raw(profile.account_id.to_string()),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Loading profile...",
            label_style,
        ))],
    };

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

fn render_message_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Message ");

    let input_line = Line::from(vec![
        Span::styled(app.support_input.clone(), Style::default().fg(Color::White)),
        Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let paragraph = Paragraph::new(vec![input_line])
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}
