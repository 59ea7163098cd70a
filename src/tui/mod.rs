//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::io::{Stdout, stdout};

use crate::db::{BoxedStore, WorkoutRecord, WorkoutStore};
use crate::exercises::SplitCategory;
use crate::split::{Planner, classify, suggest_from_history};
use crate::workout::Workout;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// App state for TUI
pub struct App {
    db: BoxedStore,
    user_id: String,
    planner: Planner,
    records: Vec<WorkoutRecord>,
    next: Option<SplitCategory>,
    should_quit: bool,
}

impl App {
    pub fn new(db: BoxedStore, user_id: String, planner: Planner) -> Result<Self> {
        let mut app = Self {
            db,
            user_id,
            planner,
            records: Vec::new(),
            next: None,
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    fn refresh(&mut self) -> Result<()> {
        self.records = self.db.list(&self.user_id)?;
        let workouts: Vec<Workout> = self.records.iter().map(|r| r.workout.clone()).collect();
        self.next = suggest_from_history(&self.planner, &workouts);
        Ok(())
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new("repchat - Workout Log")
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // Workout table
        let rows: Vec<Row> = self
            .records
            .iter()
            .map(|r| {
                let split = classify(&r.workout);
                Row::new(vec![
                    Cell::from(r.date.format("%Y-%m-%d").to_string()),
                    Cell::from(split.map(|s| s.label()).unwrap_or("-"))
                        .style(Style::default().fg(split_color(split))),
                    Cell::from(exercise_summary(&r.workout)),
                    Cell::from(r.workout.notes().to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(40),
                Constraint::Min(20),
            ],
        )
        .header(Row::new(vec!["Date", "Split", "Exercises", "Notes"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Workouts"));

        frame.render_widget(table, chunks[1]);

        // Footer
        let next = self
            .next
            .map(|s| format!("Next: {} | ", s.label()))
            .unwrap_or_default();
        let footer = Paragraph::new(format!("{}q: quit | r: refresh", next))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('r') => self.refresh()?,
                _ => {}
            }
        }
        Ok(())
    }
}

/// Badge color per split
fn split_color(split: Option<SplitCategory>) -> Color {
    match split {
        Some(SplitCategory::Push) => Color::Blue,
        Some(SplitCategory::Pull) => Color::Magenta,
        Some(SplitCategory::Legs) => Color::Green,
        Some(SplitCategory::Cardio) => Color::Red,
        Some(SplitCategory::UpperBody) => Color::LightBlue,
        Some(SplitCategory::FullBody) => Color::Yellow,
        None => Color::Gray,
    }
}

/// "Bench Press 5x5, Squat 3x10"
fn exercise_summary(workout: &Workout) -> String {
    workout
        .exercises()
        .iter()
        .map(|e| format!("{} {}x{}", e.name(), e.sets().len(), e.first_set().reps()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
