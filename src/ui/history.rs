// ============================================================================
// History screen: transaction list
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::models::{TxKind, TxStatus};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Transaction History ");

    let transactions = match &app.profile {
        Some(profile) if !profile.transactions.is_empty() => &profile.transactions,
        _ => {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No transactions yet",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .block(block)
            .alignment(Alignment::Center);

            frame.render_widget(paragraph, area);
            return;
        }
    };

    let header = Row::new(vec!["Date", "Type", "Amount", "System", "Status", "Reference"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = transactions
        .iter()
        .enumerate()
        .map(|(index, tx)| {
            let status_style = match tx.status {
                TxStatus::Success => Style::default().fg(Color::Green),
                TxStatus::Pending => Style::default().fg(Color::Yellow),
                TxStatus::Error => Style::default().fg(Color::Red),
            };

            let kind = match tx.kind {
                Some(TxKind::Deposit) => "deposit",
                Some(TxKind::Withdrawal) => "withdrawal",
                None => "-",
            };

            let mut row = Row::new(vec![
                Cell::from(tx.date_display()),
                Cell::from(kind),
                Cell::from(format!("{:+.2}", tx.sum)),
                Cell::from(tx.payment_system_display()),
                Cell::from(tx.status.label()).style(status_style),
                Cell::from(tx.transaction_id.clone()),
            ]);

            if index == app.selected_index {
                row = row.style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }

            row
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(12),
            Constraint::Percentage(13),
            Constraint::Percentage(15),
            Constraint::Percentage(12),
            Constraint::Percentage(23),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}
