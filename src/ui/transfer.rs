// ============================================================================
// Transfer screen: form and progress overlay
// ============================================================================
// The form edits a TransferRequest in place; field errors render inline in
// red. While a pipeline runs, a centered overlay shows the current stage and
// a progress gauge. Esc hides the overlay without cancelling anything.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::app::{App, TransferField};
use crate::models::{FieldError, TransferStage, TRANSFER_ASSETS};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_asset_info(frame, app, chunks[1]);
}

// ============================================================================
// Form
// ============================================================================

fn field_line<'a>(
    label: &'a str,
    value: String,
    active: bool,
    error: Option<&'a FieldError>,
) -> Vec<Line<'a>> {
    let label_style = if active {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let mut value_spans = vec![
        Span::styled(format!("{:<16}", label), label_style),
        Span::styled(value, Style::default().fg(Color::White)),
    ];
    if active {
        value_spans.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    let mut lines = vec![Line::from(value_spans)];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            format!("{:<16}{}", "", error.message()),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(""));
    lines
}

fn error_for(app: &App, field: TransferField) -> Option<&FieldError> {
    let matches_field = |error: &&FieldError| match field {
        TransferField::Currency => matches!(error, FieldError::CurrencyRequired),
        TransferField::FullName => matches!(error, FieldError::FullNameRequired),
        TransferField::Wallet => {
            matches!(error, FieldError::WalletRequired | FieldError::WalletTooShort)
        }
        TransferField::Network => matches!(error, FieldError::NetworkRequired),
        TransferField::Amount => {
            matches!(error, FieldError::AmountRequired | FieldError::AmountNotPositive)
        }
    };
    app.transfer.errors.iter().find(matches_field)
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" New Transfer ");

    let transfer = &app.transfer;
    let asset = &TRANSFER_ASSETS[transfer.asset_index];
    let active = transfer.active_field;

    let currency_value = format!("◄ {} ►", asset.title);

    let mut lines = Vec::new();
    lines.push(Line::from(""));
    lines.extend(field_line(
        TransferField::Currency.label(),
        currency_value,
        active == TransferField::Currency,
        error_for(app, TransferField::Currency),
    ));
    lines.extend(field_line(
        TransferField::FullName.label(),
        transfer.full_name.clone(),
        active == TransferField::FullName,
        error_for(app, TransferField::FullName),
    ));
    lines.extend(field_line(
        TransferField::Wallet.label(),
        transfer.wallet.clone(),
        active == TransferField::Wallet,
        error_for(app, TransferField::Wallet),
    ));
    lines.extend(field_line(
        TransferField::Network.label(),
        transfer.network.clone(),
        active == TransferField::Network,
        error_for(app, TransferField::Network),
    ));
    lines.extend(field_line(
        TransferField::Amount.label(),
        transfer.amount.clone(),
        active == TransferField::Amount,
        error_for(app, TransferField::Amount),
    ));

    // Indicative USD value, recomputed as the user types.
    let usd_value = transfer.request().usd_value();
    if usd_value > 0.0 {
        lines.push(Line::from(Span::styled(
            format!("{:<16}≈ ${:.2} USD", "", usd_value),
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

fn render_asset_info(frame: &mut Frame, app: &App, area: Rect) {
    let asset = &TRANSFER_ASSETS[app.transfer.asset_index];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", asset.title));

    let label_style = Style::default().fg(Color::Gray);
    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Network          ", label_style),
            Span::raw(asset.network),
        ]),
        Line::from(vec![
            Span::styled("Processing time  ", label_style),
            Span::raw(asset.processing_time),
        ]),
        Line::from(vec![
            Span::styled("Network fee      ", label_style),
            Span::raw(asset.fee),
        ]),
        Line::from(vec![
            Span::styled("Indicative rate  ", label_style),
            Span::raw(format!("${:.2}", asset.rate)),
        ]),
    ];

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Progress overlay
// ============================================================================

/// Centered modal drawn above the active screen while a pipeline runs.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let stage = app.transfer.stage;
    if stage == TransferStage::Idle {
        return;
    }

    let modal = centered_rect(50, 9, area);
    frame.render_widget(Clear, modal);

    let color = if stage == TransferStage::Completed {
        Color::Green
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(" Transfer in progress ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(modal);
    frame.render_widget(block, modal);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let header = Paragraph::new(vec![Line::from(Span::styled(
        format!("Step {}/5 · {}", stage.ordinal(), stage.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))])
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(stage.progress_percent()));
    frame.render_widget(gauge, chunks[1]);

    let description = Paragraph::new(vec![
        Line::from(Span::styled(
            stage.description(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "[Esc] Hide (transfer continues)",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(description, chunks[2]);
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - width_percent) / 2),
            Constraint::Percentage(width_percent),
            Constraint::Percentage((100 - width_percent) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
