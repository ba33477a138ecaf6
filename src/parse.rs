use nom::{
  branch::alt,
  bytes::complete::{tag, take, take_until},
  character::complete::{
    char, line_ending, multispace0, not_line_ending, space0, space1,
    u32 as number,
  },
  combinator::{eof, map, opt, value},
  error::{context, VerboseError},
  multi::{count, many0, many1},
  sequence::{terminated, tuple},
  Finish, IResult, Parser,
};

use crate::{Cell, Level, Maze, PortalColor};

/// Parse the `.tdm` level format:
///
/// ```text
/// Some level title
/// free comment text
/// ---
/// drills 3
/// S#.G
/// ....
/// ```
pub fn parse_to_level(s: &str) -> Result<Level, VerboseError<&str>> {
  let (s, level) = level(s).finish()?;
  debug_assert_eq!(s, "");
  Ok(level)
}

fn level(s: &str) -> IResult<&str, Level, VerboseError<&str>> {
  let (s, title) = header(s)?;
  let (s, budget) = drills_line(s)?;
  let (s, maze) = grid(s)?;
  let (s, _trail) = multispace0(s)?;
  let (s, _) = eof(s)?;
  Ok((s, Level::new(maze, title, budget)))
}

/// Returns the title
fn header(s: &str) -> IResult<&str, String, VerboseError<&str>> {
  let (s, title) = terminated(not_line_ending, line_ending)(s)?;

  let (s, _comment) =
    discard_ws_after(terminated(take_until("---"), take(3usize)))(s)?;
  Ok((s, title.to_string()))
}

fn drills_line(s: &str) -> IResult<&str, u32, VerboseError<&str>> {
  context(
    "drill budget",
    discard_ws_after(map(
      tuple((tag("drills"), space1, number)),
      |(_, _, n)| n,
    )),
  )(s)
}

fn grid(s: &str) -> IResult<&str, Maze, VerboseError<&str>> {
  // the first row fixes the width; every later row must match it
  let (s, first) = discard_ws_after(many1(a_cell))(s)?;
  let width = first.len();
  let (s, rest) = many0(|s| grid_row(s, width))(s)?;

  let mut cells = first;
  for row in rest {
    cells.extend(row);
  }

  Ok((s, Maze::new(cells, width)))
}

fn grid_row(
  s: &str,
  width: usize,
) -> IResult<&str, Vec<Cell>, VerboseError<&str>> {
  discard_ws_after(count(a_cell, width))(s)
}

fn a_cell(s: &str) -> IResult<&str, Cell, VerboseError<&str>> {
  context(
    "cell",
    alt((
      value(Cell::Empty, char('.')),
      value(Cell::Wall, char('#')),
      value(Cell::Start, char('S')),
      value(Cell::Goal, char('G')),
      value(Cell::Portal(PortalColor::A), char('A')),
      value(Cell::Portal(PortalColor::B), char('B')),
      value(Cell::Portal(PortalColor::C), char('C')),
      value(Cell::Portal(PortalColor::D), char('D')),
      value(Cell::Portal(PortalColor::E), char('E')),
    )),
  )(s)
}

// nice combinator
fn discard_ws_after<'a, O, F>(
  inner: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, VerboseError<&'a str>>
where
  F: Parser<&'a str, O, VerboseError<&'a str>>,
{
  terminated(inner, tuple((space0, opt(line_ending))))
}
