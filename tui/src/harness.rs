//! Play harness

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use aglet::{Coord, Direction4};
use crossterm::{
  cursor::MoveTo,
  event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
  style::{
    Attribute, Attributes, Color, Colors, Print, ResetColor, SetAttributes,
    SetColors, SetForegroundColor,
  },
  terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
  },
  QueueableCommand,
};
use terminal_drillmaze::{Cell, Level, Maze, Par, PortalColor, Steps};

const START_X: u16 = 2;
const START_Y: u16 = 2;

const TILE_STRIDE_X: u16 = 2;
const TILE_STRIDE_Y: u16 = 1;

/// Status lines go here; the board is drawn below them.
const BOARD_X: u16 = 2;
const BOARD_Y: u16 = 6;

/// How long to wait for a key before redrawing the clock.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct PlayHarness {
  level: Level,
  /// Live snapshot; every drilled wall swaps in a fresh maze.
  maze: Maze,
  player: usize,
  drills_left: u32,
  par: Par,

  visited: Vec<bool>,
  unique_steps: u32,

  started: Option<Instant>,
  finished: Option<Duration>,
  won: bool,

  must_redraw: bool,
}

impl PlayHarness {
  /// Transfer runtime to the harness.
  /// This will only return once the player is through.
  pub fn enter(level: Level, drills: u32) -> io::Result<()> {
    let maze = level.maze().clone();
    // a maze with no start is unplayable but shouldn't panic the terminal
    let player = maze.start().unwrap_or(0);
    let par = maze.par(drills);

    let mut visited = vec![false; maze.cells().len()];
    if let Some(slot) = visited.get_mut(player) {
      *slot = true;
    }

    let mut harness = Self {
      level,
      maze,
      player,
      drills_left: drills,
      par,
      visited,
      unique_steps: 0,
      started: None,
      finished: None,
      won: false,
      must_redraw: false,
    };

    harness.spin()?;

    Ok(())
  }

  fn spin(&mut self) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.queue(EnterAlternateScreen)?.flush()?;

    loop {
      self.draw(&mut stdout)?;

      if !event::poll(POLL_INTERVAL)? {
        // timed out; loop around so the clock ticks
        continue;
      }
      match event::read()? {
        Event::Key(ev) => {
          if matches!(ev.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            let quit = self.update(ev.code, ev.modifiers);
            if quit {
              break;
            }
          }
        }
        _ => {}
      }
    }

    stdout.queue(LeaveAlternateScreen)?.flush()?;
    disable_raw_mode()?;

    Ok(())
  }

  /// return whether to quit
  fn update(&mut self, key: KeyCode, mods: KeyModifiers) -> bool {
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
      return true;
    }

    if self.must_redraw {
      self.must_redraw = false;
    }
    if key == KeyCode::Char('l') && mods.contains(KeyModifiers::CONTROL) {
      self.must_redraw = true;
      return false;
    }

    if self.won {
      return false;
    }

    if key == KeyCode::Enter {
      if let Some(partner) = self.maze.portal_partner(self.player) {
        self.touch_clock();
        self.arrive(partner);
      }
      return false;
    }

    let dir = match key {
      KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
        Some(Direction4::West)
      }
      KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
        Some(Direction4::East)
      }
      KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
        Some(Direction4::North)
      }
      KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
        Some(Direction4::South)
      }
      _ => None,
    };
    let Some(dir) = dir else {
      return false;
    };

    let Some(next) = self.step_from(self.player, dir) else {
      return false;
    };
    self.touch_clock();

    match self.maze.cell_at(next) {
      Some(Cell::Wall) => {
        let drilling = mods.contains(KeyModifiers::SHIFT);
        if drilling && self.drills_left > 0 {
          if let Some(drilled) = self.maze.drill_wall(next) {
            self.maze = drilled;
            self.drills_left -= 1;
            // the board changed; par is stale until recomputed
            self.par = self.maze.par(self.drills_left);
            self.arrive(next);
          }
        }
      }
      Some(_) => self.arrive(next),
      None => {}
    }

    false
  }

  fn arrive(&mut self, index: usize) {
    self.player = index;
    if let Some(slot) = self.visited.get_mut(index) {
      if !*slot {
        *slot = true;
        self.unique_steps += 1;
      }
    }
    if self.maze.cell_at(index) == Some(Cell::Goal) {
      self.won = true;
      self.finished = Some(self.elapsed());
    }
  }

  fn step_from(&self, index: usize, dir: Direction4) -> Option<usize> {
    let here = self.maze.coord_of(index);
    let (dx, dy): (i64, i64) = match dir {
      Direction4::North => (0, -1),
      Direction4::South => (0, 1),
      Direction4::West => (-1, 0),
      Direction4::East => (1, 0),
    };
    let x = u32::try_from(here.x as i64 + dx).ok()?;
    let y = u32::try_from(here.y as i64 + dy).ok()?;
    self.maze.index_at(Coord::new(x, y))
  }

  fn touch_clock(&mut self) {
    if self.started.is_none() {
      self.started = Some(Instant::now());
    }
  }

  fn elapsed(&self) -> Duration {
    match (self.finished, self.started) {
      (Some(done), _) => done,
      (None, Some(started)) => started.elapsed(),
      (None, None) => Duration::ZERO,
    }
  }

  fn draw(&self, stdout: &mut Stdout) -> io::Result<()> {
    if self.must_redraw {
      stdout.queue(Clear(ClearType::All))?;
    }

    stdout.queue(MoveTo(START_X, START_Y))?;
    stdout.queue(ResetColor)?.queue(Print(self.level.title()))?;

    stdout
      .queue(MoveTo(START_X, START_Y + 1))?
      .queue(Clear(ClearType::UntilNewLine))?
      .queue(Print(format!(
        "drills left: {}   steps: {}   time: {:5.1}s",
        self.drills_left,
        self.unique_steps,
        self.elapsed().as_secs_f32(),
      )))?;

    stdout
      .queue(MoveTo(START_X, START_Y + 2))?
      .queue(Clear(ClearType::UntilNewLine))?
      .queue(Print(format!(
        "par: {} no-drill / {} with drills",
        display_steps(self.par.no_break),
        display_steps(self.par.with_break),
      )))?;

    for (i, &cell) in self.maze.cells().iter().enumerate() {
      let (ch, cols, fmt) = if i == self.player {
        ('@', Colors::new(Color::White, Color::Reset), Attribute::Bold.into())
      } else if cell == Cell::Empty && self.visited[i] {
        trail_display()
      } else {
        cell_display(cell)
      };
      let coord = self.maze.coord_of(i);
      let screenpos = grid_to_screen(coord.x, coord.y);
      stdout
        .queue(MoveTo(screenpos.0, screenpos.1))?
        .queue(SetColors(cols))?
        .queue(SetAttributes(fmt))?
        .queue(Print(ch))?;
    }

    let below =
      grid_to_screen(0, self.maze.height() as u32);
    if self.won {
      stdout
        .queue(MoveTo(below.0, below.1 + 1))?
        .queue(SetForegroundColor(Color::Green))?
        .queue(Print(format!(
          "goal reached! {} steps in {:.1}s",
          self.unique_steps,
          self.elapsed().as_secs_f32(),
        )))?;
    }

    let cursorpos = grid_to_screen(
      self.maze.coord_of(self.player).x,
      self.maze.coord_of(self.player).y,
    );
    stdout.queue(ResetColor)?.queue(MoveTo(cursorpos.0, cursorpos.1))?;

    stdout.flush()?;
    Ok(())
  }
}

fn display_steps(steps: Steps) -> String {
  match steps {
    Steps::Finite(n) => n.to_string(),
    // never shown as a number the player could chase
    Steps::Unreachable => "--".to_string(),
  }
}

fn cell_display(cell: Cell) -> (char, Colors, Attributes) {
  match cell {
    Cell::Empty => (
      '.',
      Colors::new(Color::DarkGrey, Color::Reset),
      Attribute::NormalIntensity.into(),
    ),
    Cell::Wall => (
      '#',
      Colors::new(Color::White, Color::DarkGrey),
      Attribute::Bold.into(),
    ),
    Cell::Start => (
      'S',
      Colors::new(Color::Blue, Color::Reset),
      Attribute::Bold.into(),
    ),
    Cell::Goal => (
      'G',
      Colors::new(Color::Green, Color::Reset),
      Attribute::Bold.into(),
    ),
    Cell::Portal(color) => (
      color.letter(),
      Colors::new(portal_display_color(color), Color::Reset),
      Attribute::Bold.into(),
    ),
  }
}

fn trail_display() -> (char, Colors, Attributes) {
  (
    '.',
    Colors::new(Color::DarkCyan, Color::Reset),
    Attribute::NormalIntensity.into(),
  )
}

fn portal_display_color(color: PortalColor) -> Color {
  match color {
    PortalColor::A => Color::Yellow,
    PortalColor::B => Color::Magenta,
    PortalColor::C => Color::Cyan,
    PortalColor::D => Color::DarkGreen,
    PortalColor::E => Color::Red,
  }
}

fn grid_to_screen(x: u32, y: u32) -> (u16, u16) {
  (
    x as u16 * TILE_STRIDE_X + BOARD_X,
    y as u16 * TILE_STRIDE_Y + BOARD_Y,
  )
}
