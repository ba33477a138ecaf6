pub mod solver;
pub mod validate;
mod parse;

pub use parse::parse_to_level;
pub use solver::{Par, Steps};

use aglet::Coord;
use ahash::AHashMap;

/// A playable level: a maze plus the metadata that travels with it.
#[derive(Debug, Clone)]
pub struct Level {
  maze: Maze,
  title: String,
  drill_budget: u32,
}

impl Level {
  pub fn new(maze: Maze, title: String, drill_budget: u32) -> Self {
    Self {
      maze,
      title,
      drill_budget,
    }
  }

  pub fn maze(&self) -> &Maze {
    &self.maze
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  /// Maximum walls a single run through this level may drill.
  pub fn drill_budget(&self) -> u32 {
    self.drill_budget
  }
}

/// A rectangular grid of cells in row-major order.
///
/// Cells are addressed by linear index; `row = i / width`, `col = i % width`.
/// A maze is immutable once built. Drilling a wall hands back a fresh
/// snapshot so anything still reading the old maze keeps a consistent view.
#[derive(Debug, Clone)]
pub struct Maze {
  cells: Vec<Cell>,
  width: usize,
  // portal index -> its partner, only for colors with exactly two members
  partners: AHashMap<usize, usize>,
}

impl Maze {
  pub fn new(cells: Vec<Cell>, width: usize) -> Self {
    debug_assert!(width > 0 && cells.len() % width == 0);

    let mut members: [Vec<usize>; PortalColor::ALL.len()] = Default::default();
    for (i, cell) in cells.iter().enumerate() {
      if let Cell::Portal(color) = cell {
        members[color.index()].push(i);
      }
    }

    let mut partners = AHashMap::new();
    for group in &members {
      // colors with any other count get no teleport edges
      if let [a, b] = group[..] {
        partners.insert(a, b);
        partners.insert(b, a);
      }
    }

    Self {
      cells,
      width,
      partners,
    }
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.cells.len() / self.width
  }

  pub fn cells(&self) -> &[Cell] {
    &self.cells
  }

  pub fn cell_at(&self, index: usize) -> Option<Cell> {
    self.cells.get(index).copied()
  }

  pub fn start(&self) -> Option<usize> {
    self.cells.iter().position(|&c| c == Cell::Start)
  }

  pub fn goal(&self) -> Option<usize> {
    self.cells.iter().position(|&c| c == Cell::Goal)
  }

  /// The other end of the portal at `index`, if `index` is a portal cell
  /// whose color has exactly two members. Unpaired and overfull colors
  /// have no partner and never teleport.
  pub fn portal_partner(&self, index: usize) -> Option<usize> {
    self.partners.get(&index).copied()
  }

  /// Up to four orthogonally adjacent indices, in up/down/left/right
  /// order, skipping anything past a grid edge.
  pub fn orthogonal_neighbors(&self, index: usize) -> impl Iterator<Item = usize> {
    let width = self.width;
    let len = self.cells.len();

    let mut candidates = [None; 4];
    let mut count = 0;

    if index >= width {
      candidates[count] = Some(index - width);
      count += 1;
    }
    if index + width < len {
      candidates[count] = Some(index + width);
      count += 1;
    }
    if index % width > 0 {
      candidates[count] = Some(index - 1);
      count += 1;
    }
    if index % width < width - 1 {
      candidates[count] = Some(index + 1);
      count += 1;
    }

    candidates.into_iter().take(count).flatten()
  }

  /// New snapshot with the wall at `index` opened up, or `None` if the
  /// cell isn't a wall. Walls never carry portal edges, so the partner
  /// table carries over as-is.
  pub fn drill_wall(&self, index: usize) -> Option<Maze> {
    match self.cell_at(index)? {
      Cell::Wall => {
        let mut cells = self.cells.clone();
        cells[index] = Cell::Empty;
        Some(Self {
          cells,
          width: self.width,
          partners: self.partners.clone(),
        })
      }
      _ => None,
    }
  }

  pub fn coord_of(&self, index: usize) -> Coord {
    Coord::new((index % self.width) as u32, (index / self.width) as u32)
  }

  pub fn index_at(&self, coord: Coord) -> Option<usize> {
    if (coord.x as usize) < self.width && (coord.y as usize) < self.height() {
      Some(coord.y as usize * self.width + coord.x as usize)
    } else {
      None
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
  Empty,
  Wall,
  Start,
  Goal,
  Portal(PortalColor),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalColor {
  A,
  B,
  C,
  D,
  E,
}

impl PortalColor {
  pub const ALL: [PortalColor; 5] = [
    PortalColor::A,
    PortalColor::B,
    PortalColor::C,
    PortalColor::D,
    PortalColor::E,
  ];

  pub fn index(self) -> usize {
    self as usize
  }

  pub fn letter(self) -> char {
    match self {
      PortalColor::A => 'A',
      PortalColor::B => 'B',
      PortalColor::C => 'C',
      PortalColor::D => 'D',
      PortalColor::E => 'E',
    }
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  fn cell(c: char) -> Cell {
    match c {
      '.' => Cell::Empty,
      '#' => Cell::Wall,
      'S' => Cell::Start,
      'G' => Cell::Goal,
      'A' => Cell::Portal(PortalColor::A),
      'B' => Cell::Portal(PortalColor::B),
      other => panic!("bad test cell {:?}", other),
    }
  }

  /// Build a maze from whitespace-separated rows, e.g. `"S.. .#. ..G"`.
  pub(crate) fn maze(width: usize, rows: &str) -> Maze {
    let cells = rows
      .chars()
      .filter(|c| !c.is_whitespace())
      .map(cell)
      .collect();
    Maze::new(cells, width)
  }

  #[test]
  fn neighbors_are_in_up_down_left_right_order() {
    let m = maze(3, "S.. ... ..G");
    assert_eq!(
      m.orthogonal_neighbors(4).collect::<Vec<_>>(),
      vec![1, 7, 3, 5]
    );
  }

  #[test]
  fn neighbors_stop_at_edges() {
    let m = maze(3, "S.. ... ..G");
    // top-left corner: no up, no left
    assert_eq!(m.orthogonal_neighbors(0).collect::<Vec<_>>(), vec![3, 1]);
    // bottom-right corner: no down, no right
    assert_eq!(m.orthogonal_neighbors(8).collect::<Vec<_>>(), vec![5, 7]);
    // right edge mid-row must not wrap into the next row
    assert_eq!(m.orthogonal_neighbors(5).collect::<Vec<_>>(), vec![2, 8, 4]);
  }

  #[test]
  fn cell_at_is_none_out_of_range() {
    let m = maze(3, "S.. ... ..G");
    assert_eq!(m.cell_at(8), Some(Cell::Goal));
    assert_eq!(m.cell_at(9), None);
  }

  #[test]
  fn start_and_goal_are_found() {
    let m = maze(3, "S.. ... ..G");
    assert_eq!(m.start(), Some(0));
    assert_eq!(m.goal(), Some(8));

    let empty = maze(3, "... ... ...");
    assert_eq!(empty.start(), None);
    assert_eq!(empty.goal(), None);
  }

  #[test]
  fn paired_portals_know_their_partner() {
    let m = maze(5, "SA.AG");
    assert_eq!(m.portal_partner(1), Some(3));
    assert_eq!(m.portal_partner(3), Some(1));
    assert_eq!(m.portal_partner(0), None);
  }

  #[test]
  fn degenerate_portal_groups_have_no_partner() {
    let single = maze(3, "SAG");
    assert_eq!(single.portal_partner(1), None);

    let trio = maze(7, "SA.A.AG");
    for i in [1, 3, 5] {
      assert_eq!(trio.portal_partner(i), None);
    }
  }

  #[test]
  fn drilling_a_wall_leaves_the_original_untouched() {
    let m = maze(3, "S#G");
    let drilled = m.drill_wall(1).unwrap();
    assert_eq!(drilled.cell_at(1), Some(Cell::Empty));
    assert_eq!(m.cell_at(1), Some(Cell::Wall));

    assert!(m.drill_wall(0).is_none());
    assert!(m.drill_wall(99).is_none());
  }

  #[test]
  fn coord_round_trip() {
    let m = maze(3, "S.. ... ..G");
    let c = m.coord_of(5);
    assert_eq!((c.x, c.y), (2, 1));
    assert_eq!(m.index_at(c), Some(5));
    assert_eq!(m.index_at(Coord::new(3, 0)), None);
  }
}
