//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use physidash_core::{modality_badge, CompletenessClass, DataIndicator, DatasetRecord};

use super::app::{App, InputMode};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    // Vertical layout with the status bar at the bottom
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    // Split the main area into list and detail panes
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(outer_chunks[0]);

    draw_list_pane(frame, app, pane_chunks[0]);
    draw_detail_pane(frame, app, pane_chunks[1]);
    draw_data_indicator(frame, app);

    match app.input_mode {
        InputMode::Filter => draw_filter_input(frame, app, outer_chunks[1]),
        _ => draw_status_bar(frame, app, outer_chunks[1]),
    }

    if app.input_mode == InputMode::ConfirmDelete {
        draw_confirm_overlay(frame, app);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Style for a completeness badge
fn completeness_style(class: CompletenessClass) -> Style {
    match class {
        CompletenessClass::High => Style::default().fg(Color::Green),
        CompletenessClass::Moderate => Style::default().fg(Color::Yellow),
        CompletenessClass::Low => Style::default().add_modifier(Modifier::DIM),
    }
}

fn completeness_label(record: &DatasetRecord) -> &str {
    if record.metadata_completeness.is_empty() {
        "—"
    } else {
        &record.metadata_completeness
    }
}

/// Draw the dataset list pane (left)
fn draw_list_pane(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|record| {
            let max_len = area.width.saturating_sub(4) as usize;
            let title: String = if record.display_title().chars().count() > max_len {
                let cut: String = record
                    .display_title()
                    .chars()
                    .take(max_len.saturating_sub(1))
                    .collect();
                format!("{}…", cut)
            } else {
                record.display_title().to_string()
            };

            let title_line = Line::from(vec![Span::raw(title)]);

            let mut meta_spans: Vec<Span> = Vec::new();
            if let Some(badge) = modality_badge(record) {
                meta_spans.push(Span::styled(
                    badge,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
                ));
                meta_spans.push(Span::raw("  "));
            }
            meta_spans.push(Span::styled(
                completeness_label(record).to_string(),
                completeness_style(CompletenessClass::classify(&record.metadata_completeness)),
            ));
            if !record.year.is_empty() {
                meta_spans.push(Span::styled(
                    format!("  {}", record.year),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }

            ListItem::new(vec![title_line, Line::from(meta_spans)])
        })
        .collect();

    let title = format!(
        " Datasets ({}) — refreshed {} ",
        app.view.count_label(),
        app.view.last_refresh_label()
    );
    let block = Block::default().title(title).borders(Borders::ALL);

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = ListState::default();
    if !app.rows.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the detail pane (right)
fn draw_detail_pane(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL);

    let content = if let Some(record) = app.current_record() {
        let mut lines = vec![detail_line("Title", record.display_title())];

        lines.push(detail_line("Year", &record.year));
        lines.push(detail_line("Description", &record.description));
        lines.push(detail_line("Modality", &record.physiological_modality));
        lines.push(detail_line("Condition", &record.clinical_condition));
        lines.push(detail_line("Setting", &record.environment));
        lines.push(detail_line("Task", &record.target_research_task));
        lines.push(Line::from(vec![
            Span::styled(
                "Completeness: ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                completeness_label(record).to_string(),
                completeness_style(CompletenessClass::classify(&record.metadata_completeness)),
            ),
        ]));
        lines.push(detail_line("Size", &record.dataset_size));
        lines.push(detail_line("Population", &record.population_type));
        lines.push(detail_line("Licensing", &record.licensing));
        let keywords = record.keywords_used.join(", ");
        lines.push(detail_line("Keywords", &keywords));
        lines.push(detail_line("Project", &record.parent_project));
        lines.push(detail_line("Limitations", &record.limitations));
        lines.push(detail_line(
            "URL",
            record.dataset_url.as_deref().unwrap_or(""),
        ));
        if let Some(ref curated) = record.curated_date {
            lines.push(detail_line("Curated", curated));
        }

        lines
    } else if app.view.loading {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Loading...",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "No datasets curated yet",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn detail_line(key: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", key),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(if value.is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }),
    ])
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.view.loading {
        "Loading datasets...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "r:refresh  d:delete  y:copy  J/C/M:export  /:filter  Enter:open  ?:help  q:quit"
            .to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Draw filter input at the bottom
fn draw_filter_input(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = "/";
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::raw(app.filter_text.as_str()),
        Span::styled(
            format!("  ({} matches)", app.rows.len()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);

    let cursor_col = app.filter_text[..app.filter_cursor].chars().count() as u16;
    let cursor_x = area.x + prefix.len() as u16 + cursor_col;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Draw the data-provenance indicator in the top-right corner
fn draw_data_indicator(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 5 {
        return;
    }

    let (icon, style) = if app.refresh_in_flight {
        ("↻", Style::default().fg(Color::Yellow))
    } else {
        match app.view.indicator {
            DataIndicator::Live => ("✓", Style::default().fg(Color::Green)),
            DataIndicator::Cached => ("⚡", Style::default().fg(Color::Yellow)),
            DataIndicator::Empty => ("○", Style::default().add_modifier(Modifier::DIM)),
            DataIndicator::Stale => ("✗", Style::default().fg(Color::Red)),
        }
    };

    let indicator = Paragraph::new(Span::styled(icon, style));
    let indicator_area = Rect::new(area.width - 2, 0, 1, 1);
    frame.render_widget(indicator, indicator_area);
}

/// Draw the delete confirmation popup
fn draw_confirm_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let title = app.pending_delete_title().unwrap_or("(unknown)").to_string();
    let text = vec![
        Line::from(vec![Span::styled(
            format!("Remove '{}' from this view?", title),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("The curated document is not modified;"),
        Line::from("the next refresh may restore this record."),
        Line::from(""),
        Line::from(vec![Span::styled(
            "[y] remove    [n/Esc] cancel",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 19.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg          Jump to first dataset"),
        Line::from("  G           Jump to last dataset"),
        Line::from("  Enter       Open dataset page in browser"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  r           Refresh now"),
        Line::from("  d           Remove from view (confirm)"),
        Line::from("  y           Copy collection as JSON"),
        Line::from("  J / C / M   Export JSON / CSV / Markdown"),
        Line::from("  /           Filter view"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}
