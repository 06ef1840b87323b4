// ============================================================================
// Dashboard - main interface rendering
// ============================================================================
// Top-level render router plus the shared chrome (header tabs, footer
// shortcuts, toast) and the overview screen itself: aggregate balance,
// asset cards, and the live markets table.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, NotificationKind, Screen};
use crate::ui::{deposit, history, support, transfer};

const SCREENS: [Screen; 5] = [
    Screen::Overview,
    Screen::Transfer,
    Screen::History,
    Screen::Deposit,
    Screen::Support,
];

/// Draws the whole interface for the current frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Overview => render_overview(frame, app, chunks[1]),
        Screen::Transfer => transfer::render(frame, app, chunks[1]),
        Screen::History => history::render(frame, app, chunks[1]),
        Screen::Deposit => deposit::render(frame, app, chunks[1]),
        Screen::Support => support::render(frame, app, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);

    // The progress overlay floats above whatever screen is active.
    if app.transfer.overlay_visible {
        transfer::render_overlay(frame, app, frame.size());
    }
}

/// Main layout: header, content, footer.
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header: screen tabs
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" PayDash ")
        .title_alignment(Alignment::Center);

    let mut spans = Vec::new();
    for (index, screen) in SCREENS.iter().enumerate() {
        let style = if *screen == app.current_screen {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(
            format!("[{}] {}", index + 1, screen.title()),
            style,
        ));
        if index + 1 < SCREENS.len() {
            spans.push(Span::raw("   "));
        }
    }

    let paragraph = Paragraph::new(vec![Line::from(spans)])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Overview: aggregate balance, asset cards, markets
// ============================================================================

fn render_overview(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    render_balance_summary(frame, app, chunks[0]);
    render_asset_cards(frame, app, chunks[1]);
    render_markets(frame, app, chunks[2]);
}

fn render_balance_summary(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Total Balance ");

    let account = app
        .profile
        .as_ref()
        .map(|p| format!("Account #{}  ·  {}", p.account_id, p.email))
        .unwrap_or_else(|| "Loading profile...".to_string());

    let text = vec![
        Line::from(Span::styled(
            format!("${:.2}", app.aggregate_balance),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(account, Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_asset_cards(frame: &mut Frame, app: &App, area: Rect) {
    let cards = match &app.profile {
        Some(profile) => profile.balance.sorted_cards(),
        None => return,
    };

    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();

    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, slot) in cards.iter().zip(slots.iter()) {
        let color = if card.amount != 0.0 {
            Color::Green
        } else {
            Color::Gray
        };

        let usd_line = match card.usd_value(&app.prices) {
            Some(value) => format!("≈ ${:.2}", value),
            None => "≈ $--".to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", card.title));

        let text = vec![
            Line::from(Span::styled(
                format!("{}", card.amount),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(usd_line, Style::default().fg(Color::Gray))),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, *slot);
    }
}

fn render_markets(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Markets ({}) ", app.change_range.label()));

    if app.prices.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for market data...",
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Name", "Symbol", "Price", "Change", "Market Cap"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .prices
        .coins()
        .iter()
        .map(|coin| {
            let change = coin.change_for(app.change_range);
            let change_style = if change >= 0.0 {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            let arrow = if change >= 0.0 { "▲" } else { "▼" };

            Row::new(vec![
                Cell::from(coin.name.clone()),
                Cell::from(coin.symbol.to_uppercase()),
                Cell::from(format!("${:.2}", coin.current_price)),
                Cell::from(format!("{} {:+.2}%", arrow, change)).style(change_style),
                Cell::from(coin.market_cap_display()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

// ============================================================================
// Footer: shortcuts, toast, quit confirmation
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(notification) = &app.notification {
        let color = match notification.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
        };
        Line::from(Span::styled(
            notification.message.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else {
        shortcuts_for(app.current_screen)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn shortcuts_for(screen: Screen) -> Line<'static> {
    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    match screen {
        Screen::Overview => Line::from(vec![
            Span::styled("[1-5]", key_style),
            Span::raw(" Screens  "),
            Span::styled("[c]", key_style),
            Span::raw(" Change range  "),
            Span::styled("[r]", key_style),
            Span::raw(" Refresh  "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ]),
        Screen::Transfer => Line::from(vec![
            Span::styled("[Tab]", key_style),
            Span::raw(" Next field  "),
            Span::styled("[← →]", key_style),
            Span::raw(" Currency  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Submit  "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Overview"),
        ]),
        Screen::History | Screen::Deposit => Line::from(vec![
            Span::styled("[↑↓]", key_style),
            Span::raw(" Navigate  "),
            Span::styled("[1-5]", key_style),
            Span::raw(" Screens  "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ]),
        Screen::Support => Line::from(vec![
            Span::styled("[Enter]", key_style),
            Span::raw(" Send  "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Overview  "),
            Span::styled("[1-5]", key_style),
            Span::raw(" Screens"),
        ]),
    }
}
