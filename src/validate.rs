//! Pre-publication checks for player-authored levels.
//!
//! The evaluator itself never rejects a malformed maze; it just reports
//! "unreachable". This gate runs before a level is stored so authors get
//! a specific message instead of a silently broken map.

use std::error::Error;
use std::fmt;

use crate::{Cell, Level, Par, PortalColor};

/// Check a level the way the editor does before publishing: structural
/// landmarks first, portal pairing next, then the evaluator with the
/// level's own drill budget. Returns the computed par so callers can
/// store it alongside the level.
pub fn check_publishable(level: &Level) -> Result<Par, PublishError> {
  if level.title().trim().is_empty() {
    return Err(PublishError::UntitledLevel);
  }

  let maze = level.maze();

  let mut starts = 0usize;
  let mut goals = 0usize;
  let mut portal_counts = [0usize; PortalColor::ALL.len()];
  for cell in maze.cells() {
    match cell {
      Cell::Start => starts += 1,
      Cell::Goal => goals += 1,
      Cell::Portal(color) => portal_counts[color.index()] += 1,
      Cell::Empty | Cell::Wall => {}
    }
  }

  match starts {
    0 => return Err(PublishError::MissingStart),
    1 => {}
    n => return Err(PublishError::MultipleStarts(n)),
  }
  match goals {
    0 => return Err(PublishError::MissingGoal),
    1 => {}
    n => return Err(PublishError::MultipleGoals(n)),
  }

  for color in PortalColor::ALL {
    let count = portal_counts[color.index()];
    if count != 0 && count != 2 {
      return Err(PublishError::UnpairedPortal { color, count });
    }
  }

  let par = maze.par(level.drill_budget());
  if par.with_break.is_unreachable() {
    return Err(PublishError::Unsolvable);
  }

  Ok(par)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
  UntitledLevel,
  MissingStart,
  MissingGoal,
  MultipleStarts(usize),
  MultipleGoals(usize),
  UnpairedPortal { color: PortalColor, count: usize },
  Unsolvable,
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match *self {
      PublishError::UntitledLevel => write!(f, "level has no title"),
      PublishError::MissingStart => write!(f, "missing start cell"),
      PublishError::MissingGoal => write!(f, "missing goal cell"),
      PublishError::MultipleStarts(n) => {
        write!(f, "expected one start cell, found {}", n)
      }
      PublishError::MultipleGoals(n) => {
        write!(f, "expected one goal cell, found {}", n)
      }
      PublishError::UnpairedPortal { color, count } => write!(
        f,
        "portal {} must have exactly 2 ends, found {}",
        color.letter(),
        count
      ),
      PublishError::Unsolvable => {
        write!(f, "goal unreachable even with the full drill budget")
      }
    }
  }
}

impl Error for PublishError {}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::solver::Steps;
  use crate::tests::maze;

  fn level(width: usize, rows: &str, budget: u32) -> Level {
    Level::new(maze(width, rows), "test".to_string(), budget)
  }

  #[test]
  fn a_solvable_level_passes_and_reports_par() {
    let par = check_publishable(&level(3, "S#. .#. .#G", 1)).unwrap();
    assert_eq!(par.no_break, Steps::Unreachable);
    assert_eq!(par.with_break, Steps::Finite(4));
  }

  #[test]
  fn rejects_missing_landmarks() {
    assert_eq!(
      check_publishable(&level(3, "..G", 0)),
      Err(PublishError::MissingStart)
    );
    assert_eq!(
      check_publishable(&level(3, "S..", 0)),
      Err(PublishError::MissingGoal)
    );
  }

  #[test]
  fn rejects_duplicate_landmarks() {
    assert_eq!(
      check_publishable(&level(4, "SS.G", 0)),
      Err(PublishError::MultipleStarts(2))
    );
    assert_eq!(
      check_publishable(&level(4, "S.GG", 0)),
      Err(PublishError::MultipleGoals(2))
    );
  }

  #[test]
  fn rejects_unpaired_portals() {
    assert_eq!(
      check_publishable(&level(3, "SAG", 0)),
      Err(PublishError::UnpairedPortal {
        color: PortalColor::A,
        count: 1,
      })
    );
    assert_eq!(
      check_publishable(&level(7, "SA.A.AG", 0)),
      Err(PublishError::UnpairedPortal {
        color: PortalColor::A,
        count: 3,
      })
    );
  }

  #[test]
  fn rejects_a_map_the_budget_cannot_solve() {
    // wall column, but no drills allowed
    assert_eq!(
      check_publishable(&level(3, "S#. .#. .#G", 0)),
      Err(PublishError::Unsolvable)
    );
  }

  #[test]
  fn rejects_an_empty_title() {
    let lvl = Level::new(maze(2, "SG"), "  ".to_string(), 0);
    assert_eq!(check_publishable(&lvl), Err(PublishError::UntitledLevel));
  }
}
