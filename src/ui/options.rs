use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::OptionsMenu;
use crate::config::OPTION_SPECS;

pub fn render_options(frame: &mut Frame, area: Rect, menu: &OptionsMenu) {
    let overlay_w = 52u16.min(area.width.saturating_sub(4));
    let overlay_h = (OPTION_SPECS.len() as u16 + 6).min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" OPTIONS ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    for (i, spec) in OPTION_SPECS.iter().enumerate() {
        let selected = i == menu.selected;
        let value = menu
            .draft
            .get(spec.key)
            .map(|v| v.to_string())
            .unwrap_or_default();
        let (marker, label_style, value_style) = if selected {
            (
                "\u{25b6} ",
                Style::default().fg(Color::Rgb(255, 255, 0)).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD),
            )
        } else {
            (
                "  ",
                Style::default().fg(Color::Rgb(180, 180, 200)),
                Style::default().fg(Color::Rgb(120, 120, 140)),
            )
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker}"), label_style),
            Span::styled(format!("{:<28}", spec.label), label_style),
            Span::styled(format!("{value:>8}"), value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  \u{2191}\u{2193}", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" select  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("\u{2190}\u{2192}", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" adjust  ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("Esc", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" save & exit", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
