//! Minimum-move evaluation for a maze under a drill budget.

use std::collections::VecDeque;
use std::fmt;

use ahash::AHashSet;

use crate::{Cell, Maze};

/// A move count, or the marker for "no path under these constraints".
///
/// `Unreachable` sorts after every finite count, so `min`/comparisons do
/// the right thing without a magic negative number sneaking into math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Steps {
  Finite(u32),
  Unreachable,
}

impl Steps {
  pub fn is_unreachable(self) -> bool {
    self == Steps::Unreachable
  }
}

impl fmt::Display for Steps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Steps::Finite(n) => write!(f, "{}", n),
      Steps::Unreachable => write!(f, "unreachable"),
    }
  }
}

/// The two par targets shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Par {
  /// Shortest run that never touches a wall.
  pub no_break: Steps,
  /// Shortest run allowed to drill up to the budget.
  pub with_break: Steps,
}

impl Maze {
  /// Par for this maze: minimum moves with no drilling at all, and with
  /// up to `drill_budget` walls drilled. Pure; the maze is not touched.
  pub fn par(&self, drill_budget: u32) -> Par {
    Par {
      no_break: self.min_steps(0),
      with_break: self.min_steps(drill_budget),
    }
  }

  /// Breadth-first search over `(position, drills_used)` states.
  ///
  /// Every move costs one step and teleports cost zero, so a FIFO
  /// frontier dequeues states in non-decreasing step order and the first
  /// time the goal comes off the queue its step count is minimal. The
  /// state space is at most `cells * (max_drills + 1)`, so the search
  /// always terminates.
  fn min_steps(&self, max_drills: u32) -> Steps {
    let (Some(start), Some(goal)) = (self.start(), self.goal()) else {
      // no start or no goal is just an unsolvable maze, not an error
      return Steps::Unreachable;
    };

    let mut visited = AHashSet::new();
    let mut frontier = VecDeque::new();
    visited.insert((start, 0));
    frontier.push_back((start, 0u32, 0u32));

    while let Some((pos, drills, steps)) = frontier.pop_front() {
      if pos == goal {
        return Steps::Finite(steps);
      }

      // Standing on a portal offers a free hop to its twin. Landing on
      // a portal by walking never auto-teleports; the hop is its own
      // edge, taken or not.
      if let Some(partner) = self.portal_partner(pos) {
        if visited.insert((partner, drills)) {
          frontier.push_back((partner, drills, steps));
        }
      }

      for next in self.orthogonal_neighbors(pos) {
        let drills_after = match self.cell_at(next) {
          Some(Cell::Wall) => {
            if drills == max_drills {
              continue;
            }
            drills + 1
          }
          Some(_) => drills,
          None => continue,
        };

        if visited.insert((next, drills_after)) {
          frontier.push_back((next, drills_after, steps + 1));
        }
      }
    }

    Steps::Unreachable
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tests::maze;

  // The original game's built-in level: start top-left, goal
  // bottom-right, one pair each of A and B portals.
  const CLASSIC: &str = "
    S#...#.B
    .#.#...#
    ...#.###
    .####...
    ##B#.#..
    ...#..#A
    .######.
    ..A#...G
  ";

  #[test]
  fn classic_level_par() {
    let m = maze(8, CLASSIC);
    assert_eq!(
      m.par(2),
      Par {
        no_break: Steps::Finite(22),
        with_break: Steps::Finite(11),
      }
    );
    assert_eq!(m.par(3).with_break, Steps::Finite(11));
  }

  #[test]
  fn more_drills_never_lengthen_the_path() {
    let m = maze(8, CLASSIC);
    let mut best = Steps::Unreachable;
    for budget in 0..=4 {
      let par = m.par(budget);
      assert!(par.with_break <= best);
      best = par.with_break;
    }
  }

  #[test]
  fn zero_budget_matches_no_break() {
    for (width, rows) in [(8, CLASSIC), (3, "S#. .#. .#G"), (3, "S.. .#. ..G")] {
      let par = maze(width, rows).par(0);
      assert_eq!(par.no_break, par.with_break);
    }
  }

  #[test]
  fn wall_column_needs_a_drill() {
    // a full wall column splits start from goal
    let m = maze(3, "S#. .#. .#G");
    assert_eq!(
      m.par(1),
      Par {
        no_break: Steps::Unreachable,
        with_break: Steps::Finite(4),
      }
    );
  }

  #[test]
  fn lone_wall_has_a_free_detour() {
    let m = maze(3, "S.. .#. ..G");
    assert_eq!(
      m.par(1),
      Par {
        no_break: Steps::Finite(4),
        with_break: Steps::Finite(4),
      }
    );
  }

  #[test]
  fn boxed_goal_is_unreachable_without_drilling() {
    let m = maze(5, "S.... ..... .###. .#G#. .###.");
    let par = m.par(1);
    assert_eq!(par.no_break, Steps::Unreachable);
    assert_eq!(par.with_break, Steps::Finite(5));
  }

  #[test]
  fn teleport_hops_cost_nothing() {
    // walking the row is 6 moves; portal in, portal out is 2
    let m = maze(7, "SA...AG");
    assert_eq!(m.par(0).no_break, Steps::Finite(2));
  }

  #[test]
  fn unpaired_portal_is_just_floor() {
    let m = maze(3, "SAG");
    assert_eq!(m.par(0).no_break, Steps::Finite(2));
  }

  #[test]
  fn portal_trio_never_teleports() {
    let m = maze(7, "SA.A.AG");
    assert_eq!(m.par(0).no_break, Steps::Finite(6));
  }

  #[test]
  fn missing_start_or_goal_is_unreachable() {
    for rows in ["... ... ..G", "S.. ... ...", "... ... ..."] {
      let par = maze(3, rows).par(5);
      assert_eq!(par.no_break, Steps::Unreachable);
      assert_eq!(par.with_break, Steps::Unreachable);
    }
  }

  #[test]
  fn evaluation_is_idempotent() {
    let m = maze(8, CLASSIC);
    assert_eq!(m.par(3), m.par(3));
  }

  #[test]
  fn unreachable_sorts_after_any_finite_count() {
    assert!(Steps::Finite(u32::MAX) < Steps::Unreachable);
    assert!(Steps::Finite(3) < Steps::Finite(4));
  }
}
