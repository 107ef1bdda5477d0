pub mod field;
pub mod options;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, GameState};
use crate::game::{GameOverReason, MAX_PLAYER_BULLETS};

use field::FieldView;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(80, 255, 80)))
        .title(" Space Invaders ")
        .title_style(Style::default().fg(Color::Rgb(100, 255, 100)).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(app)), chunks[0]);

    let fw = chunks[1].width as usize;
    let fh = chunks[1].height as usize;
    if fw > 0 && fh > 0 {
        let view = FieldView {
            world: &app.world,
            player: &app.assets.player,
            alien: &app.assets.alien,
            bullet: &app.assets.bullet,
            frame: app.frame(),
        };
        frame.render_widget(Paragraph::new(view.lines(fw, fh)), chunks[1]);
    }

    frame.render_widget(Paragraph::new(help_line(app)), chunks[2]);

    match app.state {
        GameState::Paused => render_banner(
            frame,
            chunks[1],
            " PAUSED ",
            "Press P to resume",
            Color::Yellow,
        ),
        GameState::GameOver => {
            let detail = match app.world.game_over() {
                Some(GameOverReason::AlienBreach) => "The invaders landed!",
                _ => "Out of lives!",
            };
            render_banner(frame, chunks[1], " GAME OVER ", detail, Color::Red);
        }
        GameState::OptionsMenu => options::render_options(frame, chunks[1], &app.menu),
        GameState::Playing | GameState::Quit => {}
    }
}

fn status_line(app: &App) -> Line<'static> {
    let world = &app.world;
    let lives_str = "\u{2666} ".repeat(world.lives() as usize);
    let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
    Line::from(vec![
        Span::styled(" \u{1f47e} ", Style::default()),
        Span::styled(
            format!("Score: {} ", world.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("Lives: {}", lives_str),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(
            format!("High: {} ", app.displayed_high_score()),
            Style::default().fg(Color::Cyan),
        ),
        sep(),
        Span::styled(format!("Wave: {} ", world.wave()), Style::default().fg(Color::Green)),
        sep(),
        Span::styled(
            format!("Aliens: {} ", world.formation().alive_count()),
            Style::default().fg(Color::Rgb(255, 80, 80)),
        ),
        sep(),
        Span::styled(
            format!("Bullets: {}/{} ", world.player_bullets_in_flight(), MAX_PLAYER_BULLETS),
            Style::default().fg(Color::Gray),
        ),
    ])
}

fn help_line(app: &App) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let text = |t: &'static str| Span::styled(t, Style::default().fg(Color::DarkGray));
    match app.state {
        GameState::GameOver => Line::from(vec![
            Span::styled(" GAME OVER! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            key("R"),
            text(" restart  "),
            key("Q"),
            text(" quit"),
        ]),
        GameState::OptionsMenu => Line::from(vec![
            text(" Adjusting options  "),
            key("Esc"),
            text(" save & resume  "),
            key("Q"),
            text(" quit"),
        ]),
        _ => Line::from(vec![
            key(" \u{2190}\u{2192}"),
            text(" Move  "),
            key("Space"),
            text(" Shoot  "),
            key("P"),
            text(" Pause  "),
            key("O"),
            text(" Options  "),
            key("Q"),
            text(" Quit"),
        ]),
    }
}

fn render_banner(frame: &mut Frame, area: Rect, title: &str, detail: &str, color: Color) {
    let w = 36u16.min(area.width);
    let h = 4u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let banner = Rect::new(x, y, w, h);

    frame.render_widget(Clear, banner);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .title(title.to_string())
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let p = Paragraph::new(vec![Line::from(Span::styled(
        detail.to_string(),
        Style::default().fg(Color::Gray),
    ))])
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(p, banner);
}
