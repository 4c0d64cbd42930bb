//! Frame rendering. Pure functions of [`App`] state.

use cogito::core::feed::FEED_VIEW_LINES;
use cogito::core::types::{EngineStatus, Mode, Step, StepStatus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::app::App;

const INPUT_PLACEHOLDER: &str = "e.g., create a new react app...";

pub fn render(frame: &mut Frame, app: &App) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = outer.inner(frame.area());
    frame.render_widget(outer, frame.area());

    let [header, body, feed, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(FEED_VIEW_LINES as u16 + 3),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(header_line(app), header);
    render_body(frame, app, body);
    frame.render_widget(feed_panel(app), feed);
    frame.render_widget(footer_line(app), footer);
}

/// Key labels for the header and footer. Plan mode types printable keys into the
/// goal, so its hints name the chorded keys instead.
struct KeyHints {
    plan: &'static str,
    build: &'static str,
    auto_run: &'static str,
    quit: &'static str,
}

fn key_hints(mode: Mode) -> KeyHints {
    match mode {
        Mode::Plan => KeyHints {
            plan: "PLAN",
            build: "BUILD (Tab)",
            auto_run: "AUTORUN (Ctrl+A)",
            quit: "Enter to submit, Tab for build, Ctrl+C to quit.",
        },
        Mode::Build => KeyHints {
            plan: "PLAN (p)",
            build: "BUILD (b)",
            auto_run: "AUTORUN (a)",
            quit: "Press 'q' to quit.",
        },
    }
}

fn header_line(app: &App) -> Paragraph<'static> {
    let mode = app.session.mode();
    let hints = key_hints(mode);
    let tab = |label: &'static str, active: bool, color: Color| {
        if active {
            Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(label, Style::default().fg(Color::Gray))
        }
    };
    let auto_run = app.session.auto_run();
    Paragraph::new(Line::from(vec![
        Span::styled("🧠 Cogito", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        tab(hints.plan, mode == Mode::Plan, Color::Blue),
        Span::raw(" | "),
        tab(hints.build, mode == Mode::Build, Color::Green),
        Span::raw(" | "),
        Span::styled(
            format!("{}: {}", hints.auto_run, if auto_run { "ON" } else { "OFF" }),
            Style::default().fg(if auto_run { Color::Magenta } else { Color::Gray }),
        ),
    ]))
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let thinking = app.session.status() == EngineStatus::Thinking;
    let mut lines = Vec::new();
    if thinking {
        lines.push(Line::from(vec![
            Span::styled(app.spinner(), Style::default().fg(Color::Green)),
            Span::raw(" Thinking..."),
        ]));
    }
    match app.session.mode() {
        Mode::Plan if !thinking => lines.extend(plan_lines(&app.input)),
        Mode::Plan => {}
        Mode::Build => lines.extend(build_lines(app)),
    }
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn plan_lines(input: &str) -> Vec<Line<'static>> {
    let field = if input.is_empty() {
        Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input.to_string())
    };
    vec![
        Line::from(Span::styled(
            "What is your goal?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::styled("> ", Style::default().fg(Color::Cyan)), field]),
        Line::from(Span::styled(
            "(Press Enter to submit)",
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn build_lines(app: &App) -> Vec<Line<'static>> {
    let roadmap = app.session.roadmap();
    let mut lines = vec![
        Line::from(Span::styled(
            "Thought Sequence (Roadmap)",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Use Up/Down arrows to select a step. Press Enter to execute.",
            Style::default().fg(Color::Gray),
        )),
    ];
    for (idx, step) in roadmap.steps().iter().enumerate() {
        let (indicator, color) = indicator(step, idx == roadmap.focus());
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("{indicator} {}", step.title),
            Style::default().fg(color),
        )));
        lines.push(Line::from(Span::styled(
            format!("   └── Command: `{}`", step.cmd),
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

/// Status marker for a step row. Status wins over focus.
fn indicator(step: &Step, focused: bool) -> (&'static str, Color) {
    match step.status {
        StepStatus::Completed => ("✅", Color::Green),
        StepStatus::Executing => ("⏳", Color::Yellow),
        StepStatus::Failed => ("❌", Color::Red),
        StepStatus::Pending if focused => ("➡️", Color::Cyan),
        StepStatus::Pending => (" ", Color::White),
    }
}

fn feed_panel(app: &App) -> Paragraph<'static> {
    let lines: Vec<Line> = app
        .session
        .recent_feed()
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.replace('\n', " "),
                Style::default().fg(Color::Gray),
            ))
        })
        .collect();
    Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Rounded)
                .title(Span::styled(
                    "Interactive Feed",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
}

fn footer_line(app: &App) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled(
            key_hints(app.session.mode()).quit,
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(
            app.session.workdir().display().to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogito::io::shell::CommandReport;
    use cogito::io::workdir::WorkingDirectory;
    use cogito::session::Session;
    use cogito::test_support::session_with_plan;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal
            .draw(|frame| render(frame, app))
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn plan_view_shows_prompt_and_placeholder() {
        let app = App::new(Session::new(WorkingDirectory::new("/home/user")));
        let screen = draw(&app);
        assert!(screen.contains("What is your goal?"));
        assert!(screen.contains(INPUT_PLACEHOLDER));
        assert!(screen.contains("AUTORUN (Ctrl+A): OFF"));
        assert!(screen.contains("BUILD (Tab)"));
        assert!(screen.contains("Ctrl+C to quit."));
        assert!(!screen.contains("Press 'q' to quit."));
        assert!(!screen.contains("PLAN (p)"));
        assert!(screen.contains("Awaiting your thoughts"));
        assert!(screen.contains("/home/user"));
    }

    #[test]
    fn thinking_replaces_plan_prompt() {
        let mut app = App::new(Session::new(WorkingDirectory::new("/home/user")));
        app.session.submit_goal("new app").expect("accepted");
        let screen = draw(&app);
        assert!(screen.contains("Thinking..."));
        assert!(!screen.contains("What is your goal?"));
    }

    #[test]
    fn build_view_lists_steps_and_commands() {
        let mut app = App::new(session_with_plan("/home/user", &["mkdir demo", "ls"]));
        app.session.set_mode(Mode::Build);
        app.session.set_auto_run(true);
        let screen = draw(&app);
        assert!(screen.contains("Thought Sequence (Roadmap)"));
        assert!(screen.contains("Command: `mkdir demo`"));
        assert!(screen.contains("Command: `ls`"));
        assert!(screen.contains("AUTORUN (a): ON"));
        assert!(screen.contains("PLAN (p)"));
        assert!(screen.contains("Press 'q' to quit."));
    }

    #[test]
    fn feed_flattens_multiline_output() {
        let mut app = App::new(session_with_plan("/home/user", &["ls"]));
        app.session.set_mode(Mode::Build);
        app.session.execute_step(1).expect("dispatch");
        app.session
            .complete(1, Ok(CommandReport::succeeded("a.txt\nb.txt")));
        let screen = draw(&app);
        assert!(screen.contains("[Success] a.txt b.txt"));
    }

    #[test]
    fn indicator_prefers_status_over_focus() {
        let mut step = Step {
            id: 1,
            title: "t".to_string(),
            cmd: "ls".to_string(),
            desc: String::new(),
            status: StepStatus::Failed,
        };
        assert_eq!(indicator(&step, true), ("❌", Color::Red));
        step.status = StepStatus::Pending;
        assert_eq!(indicator(&step, true), ("➡️", Color::Cyan));
        assert_eq!(indicator(&step, false), (" ", Color::White));
    }
}
