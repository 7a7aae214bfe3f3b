use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
// Popup from tui-widgets renders the delete confirmation
use tui_widgets::popup::Popup;

use crate::config::RgbColor;
use crate::contact::Field;

use super::app::{App, PaneFocus};

const FORM_PANE_WIDTH: u16 = 40;
const FORM_HELP_CREATE: &str = "Tab/\u{2193}: next field  Enter: Add  Esc: contact list";
const FORM_HELP_EDIT: &str = "Tab/\u{2193}: next field  Enter: Update  Esc: cancel edit";
const LIST_HELP: &str = "j/k: nav  Enter: more/less  e: edit  d: delete  a: add  q: quit";
const CONFIRM_HELP: &str = "y: delete  n/Esc: keep";

pub fn render<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame<'_>, app: &mut App) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_body(frame, layout[1], app);
    draw_footer(frame, layout[2], app);
    draw_confirm_modal(frame, size, app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let style = header_text_style(app);
    let count = app.store.len();
    let left = format!(
        "CARDFILE \u{2014} {} contact{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    let mode = if app.session.is_editing() {
        "EDIT MODE"
    } else {
        "ADD MODE"
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(mode.len() as u16 + 2)])
        .split(area);

    frame.render_widget(Paragraph::new(Span::styled(left, style)), chunks[0]);

    let mode_style = if app.session.is_editing() {
        selection_style(app).add_modifier(Modifier::BOLD)
    } else {
        style
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {} ", mode), mode_style)),
        chunks[1],
    );
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_PANE_WIDTH), Constraint::Min(0)])
        .split(area);

    draw_form(frame, chunks[0], app);
    draw_list(frame, chunks[1], app);
}

// =============================================================================
// Form pane
// =============================================================================

fn draw_form(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.focus == PaneFocus::Form;
    let title = if app.session.is_editing() {
        "EDIT CONTACT"
    } else {
        "CONTACT FORM"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(app, active));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let label_width = Field::ALL
        .iter()
        .map(|f| f.label().len())
        .max()
        .unwrap_or(0)
        + 1; // room for the required marker

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(u16, u16)> = None;

    for field in Field::ALL {
        let focused = active && field == app.focused_field;
        let marker = if field.required() { "*" } else { " " };
        let label = format!("{:<width$} ", format!("{}{}", field.label(), marker), width = label_width);
        let value = app.inputs.value(field);

        let value_style = if focused {
            selection_style(app)
        } else {
            Style::default()
        };
        if focused {
            let column = label.len() + app.inputs.visual_cursor(field);
            let row = lines.len() as u16;
            if (column as u16) < inner.width && row < inner.height {
                cursor = Some((inner.x + column as u16, inner.y + row));
            }
        }

        lines.push(Line::from(vec![
            Span::styled(label, header_text_style(app)),
            Span::styled(value, value_style),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", app.submit_label()),
        if active {
            header_text_style(app).add_modifier(Modifier::BOLD)
        } else {
            header_text_style(app)
        },
    )));

    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    if let Some((x, y)) = cursor {
        frame.set_cursor_position((x, y));
    }
}

// =============================================================================
// Contact list pane
// =============================================================================

fn draw_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.focus == PaneFocus::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("CONTACTS")
        .border_style(border_style(app, active));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let contacts = app.visible_contacts();
    if contacts.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No contacts yet", header_text_style(app))),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = contacts
        .iter()
        .map(|contact| {
            let expanded = app.is_expanded(contact.id);
            let record = &contact.record;

            let mut lines = vec![
                Line::from(Span::styled(
                    record.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("  {}", record.locality())),
            ];
            if expanded {
                if !record.email.is_empty() {
                    lines.push(Line::from(format!("  {}", record.email)));
                }
                if !record.phone.is_empty() {
                    lines.push(Line::from(format!("  {}", record.phone)));
                }
                let address = format!("  {} {}", record.address, record.zipcode);
                if !address.trim().is_empty() {
                    lines.push(Line::from(address));
                }
                lines.push(Line::from(Span::styled(
                    "  \u{25be} See Less",
                    header_text_style(app),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "  \u{25b8} See More",
                    header_text_style(app),
                )));
            }
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let mut state = ListState::default();
    if active {
        state.select(Some(app.selected.min(contacts.len() - 1)));
    }

    let list = List::new(items).highlight_style(selection_style(app));
    frame.render_stateful_widget(list, inner, &mut state);
}

// =============================================================================
// Footer and modal
// =============================================================================

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let message: String = if app.confirm_modal.is_some() {
        CONFIRM_HELP.to_string()
    } else if let Some(status) = &app.status {
        status.clone()
    } else {
        match app.focus {
            PaneFocus::Form if app.session.is_editing() => FORM_HELP_EDIT.to_string(),
            PaneFocus::Form => FORM_HELP_CREATE.to_string(),
            PaneFocus::List => LIST_HELP.to_string(),
        }
    };

    let colors = app.ui_colors();
    let style = Style::default()
        .fg(color(colors.status_fg))
        .bg(color(colors.status_bg));

    let background = Block::default().style(Style::default().bg(color(colors.status_bg)));
    frame.render_widget(background, area);
    frame.render_widget(Paragraph::new(message).style(style), area);
}

fn draw_confirm_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(modal) = app.confirm_modal.as_ref() else {
        return;
    };

    let body = Text::from(vec![
        Line::from(modal.message.clone()),
        Line::default(),
        Line::from(CONFIRM_HELP),
    ]);

    let title_line = Line::from(Span::styled(modal.title.clone(), header_text_style(app)));
    let popup = Popup::new(body)
        .title(title_line)
        .border_style(border_style(app, true));

    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

// =============================================================================
// Styles
// =============================================================================

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn border_style(app: &App, active: bool) -> Style {
    let colors = app.ui_colors();
    let style = Style::default().fg(color(colors.border));
    if active {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn selection_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default()
        .fg(color(colors.selection_fg))
        .bg(color(colors.selection_bg))
}

fn header_text_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default().fg(color(colors.status_fg))
}
