use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Gauge, Paragraph,
        canvas::{Canvas, Context},
    },
};
use zim_trim::playback::AudioResource;
use zim_trim::trim::{BarInstruction, BarState, DragState, PreviewOutput, waveform::amplitude_to_block};
use zim_trim::utils::time::format_time;

use super::app::TrimApp;
use super::playlist::PlayListApp;

/// Draw the trimmer. Returns the inner rectangle of the waveform, which is
/// what pointer columns are mapped against.
pub fn draw_trim<P: PreviewOutput>(f: &mut Frame, app: &TrimApp<P>) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Selection info
            Constraint::Min(7),    // Waveform
            Constraint::Length(3), // Preview progress
            Constraint::Length(3), // Controls
        ])
        .split(f.area());

    let title = Paragraph::new("✂ ztrim")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_selection_info(f, chunks[1], app);
    let waveform_area = draw_waveform(f, chunks[2], app);
    draw_preview_progress(f, chunks[3], app);
    draw_trim_controls(f, chunks[4], app);

    waveform_area
}

fn draw_selection_info<P: PreviewOutput>(f: &mut Frame, area: Rect, app: &TrimApp<P>) {
    let editor = &app.editor;
    let sel = editor.selection();

    let first = Line::from(vec![
        Span::styled(app.file_name.as_str(), Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(
            format_time(editor.total_duration()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let second = match editor.status() {
        Some(status) => Line::from(Span::styled(status, Style::default().fg(Color::Yellow))),
        None => Line::from(vec![
            Span::raw("Selection "),
            Span::styled(format_time(sel.start_offset), Style::default().fg(Color::Green)),
            Span::raw(" → "),
            Span::styled(format_time(sel.end()), Style::default().fg(Color::Red)),
            Span::raw(format!("  ({:.1}s)", sel.length)),
        ]),
    };

    let info = Paragraph::new(vec![first, second]).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn bar_color(state: BarState) -> Color {
    match state {
        BarState::Unselected => Color::DarkGray,
        BarState::Selected => Color::Cyan,
        BarState::Playing => Color::Yellow,
    }
}

fn draw_waveform<P: PreviewOutput>(f: &mut Frame, area: Rect, app: &TrimApp<P>) -> Rect {
    let editor = &app.editor;
    let title = match editor.drag_state() {
        DragState::Idle => " waveform ",
        DragState::DraggingStart => " moving start ",
        DragState::DraggingEnd => " moving end ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(area);

    let bars = editor.bars();
    if bars.is_empty() {
        let empty = Paragraph::new("No waveform: the file could not be decoded")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return inner;
    }

    let count = bars.len() as f64;
    let total = editor.total_duration();
    let sel = editor.selection();
    let (start_x, end_x) = if total > 0.0 {
        (sel.start_offset / total * count, sel.end() / total * count)
    } else {
        (0.0, count)
    };

    let canvas = Canvas::default()
        .block(block)
        .paint(|ctx| {
            for bar in &bars {
                draw_bar(ctx, bar);
            }
            draw_handle(ctx, start_x, Color::Green);
            draw_handle(ctx, end_x, Color::Red);
        })
        .x_bounds([0.0, count])
        .y_bounds([-1.0, 1.0]);
    f.render_widget(canvas, area);

    inner
}

fn draw_bar(ctx: &mut Context, bar: &BarInstruction) {
    // Keep silent bars visible as a dot on the centre line
    let height = (bar.amplitude as f64).max(0.02);
    let x = bar.index as f64 + 0.5;
    ctx.draw(&ratatui::widgets::canvas::Line {
        x1: x,
        y1: -height,
        x2: x,
        y2: height,
        color: bar_color(bar.state),
    });
}

fn draw_handle(ctx: &mut Context, x: f64, color: Color) {
    ctx.draw(&ratatui::widgets::canvas::Line {
        x1: x,
        y1: -1.0,
        x2: x,
        y2: 1.0,
        color,
    });
}

fn draw_preview_progress<P: PreviewOutput>(f: &mut Frame, area: Rect, app: &TrimApp<P>) {
    let editor = &app.editor;
    let sel = editor.selection();
    let state = editor.playback_state();

    let ratio = if sel.length > 0.0 {
        ((state.current_time - sel.start_offset) / sel.length).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let icon = if state.is_playing { "▶" } else { "⏸" };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" preview "))
        .gauge_style(Style::default().fg(Color::Yellow))
        .ratio(ratio)
        .label(format!("{icon} {}", format_time(state.current_time)));
    f.render_widget(gauge, area);
}

fn draw_trim_controls<P: PreviewOutput>(f: &mut Frame, area: Rect, app: &TrimApp<P>) {
    let editor = &app.editor;
    let control_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let playing = editor.playback_state().is_playing;
    let row1 = vec![
        Span::styled(
            "[space]",
            Style::default().fg(if playing { Color::Yellow } else { Color::Green }),
        ),
        Span::raw(if playing { " pause  " } else { " preview  " }),
        Span::styled("[←→]", Style::default().fg(Color::Magenta)),
        Span::raw(" move  "),
        Span::styled("[ ]", Style::default().fg(Color::Magenta)),
        Span::raw(" resize  "),
        Span::styled("[u]", Style::default().fg(Color::Blue)),
        Span::raw(format!(" undo ({})", editor.history_len())),
    ];

    let confirm_style = if editor.can_confirm() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let row2 = vec![
        Span::styled("[enter]", confirm_style),
        Span::raw(" confirm  "),
        Span::styled("[esc]", Style::default().fg(Color::Red)),
        Span::raw(" cancel  "),
        Span::styled("drag", Style::default().fg(Color::Cyan)),
        Span::raw(" handles or click to move"),
    ];

    f.render_widget(Block::default().borders(Borders::TOP), control_chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(row1)).alignment(Alignment::Center),
        control_chunks[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(row2)).alignment(Alignment::Center),
        control_chunks[2],
    );
}

/// Draw the clip list. Returns the list's inner rectangle and the index of
/// its first visible row.
pub fn draw_playlist<R: AudioResource>(f: &mut Frame, app: &PlayListApp<R>) -> (Rect, usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(3),    // Clips
            Constraint::Length(1), // Message
            Constraint::Length(3), // Controls
        ])
        .split(f.area());

    let now_playing = app
        .service
        .active_descriptor()
        .and_then(|d| d.title.clone())
        .unwrap_or_else(|| "nothing loaded".to_string());
    let title = Paragraph::new(format!("🎵 ztrim player · {now_playing}"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" clips ({}) ", app.cards.len()));
    let inner = block.inner(chunks[1]);
    let offset = app.scroll_offset(inner.height as usize);

    let title_width = (inner.width as usize).saturating_sub(super::playlist::STRIP_BARS + 20).clamp(8, 40);
    let lines: Vec<Line> = app
        .cards
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner.height as usize)
        .map(|(index, card)| card_line(app, index, card, title_width))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), chunks[1]);

    if let Some(message) = &app.message {
        let msg = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(msg, chunks[2]);
    }

    let controls = vec![
        Span::styled("[space]", Style::default().fg(Color::Green)),
        Span::raw(" play/pause  "),
        Span::styled("[↑↓]", Style::default().fg(Color::Blue)),
        Span::raw(" select  "),
        Span::styled("[←→]", Style::default().fg(Color::Magenta)),
        Span::raw(" seek  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];
    let controls_widget = Paragraph::new(Line::from(controls))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(controls_widget, chunks[3]);

    (inner, offset)
}

fn card_line<'a, R: AudioResource>(
    app: &'a PlayListApp<R>,
    index: usize,
    card: &'a super::playlist::Card,
    title_width: usize,
) -> Line<'a> {
    let service = &app.service;
    let active = service.is_active(&card.media_id);
    let marker = if service.is_playing(&card.media_id) {
        "▶ "
    } else if active {
        "⏸ "
    } else {
        "  "
    };

    let title: String = card.title.chars().take(title_width).collect();
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::raw(format!("{title:<title_width$} ")),
    ];

    let played_bars = if active {
        (service.progress() * card.strip.len() as f64).round() as usize
    } else {
        0
    };
    for (bar, &amplitude) in card.strip.amplitudes().iter().enumerate() {
        let color = if bar < played_bars {
            Color::Cyan
        } else if active {
            Color::Gray
        } else {
            Color::DarkGray
        };
        spans.push(Span::styled(
            amplitude_to_block(amplitude),
            Style::default().fg(color),
        ));
    }

    let time = if active {
        format!(
            " {} / {}",
            format_time(service.current_time()),
            format_time(service.duration())
        )
    } else {
        format!(" {}", format_time(card.duration))
    };
    spans.push(Span::styled(time, Style::default().fg(Color::White)));

    let line = Line::from(spans);
    if index == app.selected {
        line.style(Style::default().bg(Color::DarkGray))
    } else {
        line
    }
}
