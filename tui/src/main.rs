mod harness;

use std::fs;
use std::path::Path;

use argh::FromArgs;
use eyre::eyre;
use harness::PlayHarness;
use terminal_drillmaze::{parse_to_level, validate, Level};

/// The original game's built-in grid, kept as the default board.
const CLASSIC_LEVEL: &str = "Classic drill run
Two portal pairs, a drill budget of three.
---
drills 3
S#...#.B
.#.#...#
...#.###
.####...
##B#.#..
...#..#A
.######.
..A#...G
";

fn main() -> eyre::Result<()> {
  let args: ArgsEntrypoint = argh::from_env();

  match args.sub {
    Subcommands::Play(play) => play.run()?,
    Subcommands::Par(par) => par.run()?,
    Subcommands::Publish(publish) => publish.run()?,
    Subcommands::Browse(browse) => browse.run()?,
  }

  Ok(())
}

#[derive(FromArgs, Debug)]
/// A terminal maze game about drilling through walls and jumping portals.
struct ArgsEntrypoint {
  #[argh(subcommand)]
  sub: Subcommands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Subcommands {
  Play(CmdPlay),
  Par(CmdPar),
  Publish(CmdPublish),
  Browse(CmdBrowse),
}

/// Play a level in the terminal.
///
/// Controls:
/// - Arrow keys or HJKL to move. Hold shift to drill through an adjacent
///   wall, budget permitting.
/// - Enter to teleport while standing on a portal.
/// - Ctrl+C to quit.
/// - Ctrl+L to redraw the screen.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "play")]
struct CmdPlay {
  /// path to a `.tdm` level file; the built-in level when omitted.
  #[argh(positional)]
  path: Option<String>,

  /// play with no drills at all, whatever the level allows.
  #[argh(switch)]
  no_drills: bool,
}

impl CmdPlay {
  fn run(&self) -> eyre::Result<()> {
    let level = match &self.path {
      Some(path) => load_level(path)?,
      None => {
        parse_to_level(CLASSIC_LEVEL).map_err(|e| eyre!("{}", e.to_string()))?
      }
    };
    let drills = if self.no_drills {
      0
    } else {
      level.drill_budget()
    };
    PlayHarness::enter(level, drills)?;
    Ok(())
  }
}

/// Print the par targets for a level file.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "par")]
struct CmdPar {
  /// path to a `.tdm` level file.
  #[argh(positional)]
  path: String,
}

impl CmdPar {
  fn run(&self) -> eyre::Result<()> {
    let level = load_level(&self.path)?;
    let par = level.maze().par(level.drill_budget());

    println!("{}", level.title());
    println!("par, no drilling: {}", par.no_break);
    println!(
      "par, up to {} drill(s): {}",
      level.drill_budget(),
      par.with_break
    );
    Ok(())
  }
}

/// Validate a level and, if it holds up, copy it into the level library.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "publish")]
struct CmdPublish {
  /// path to a `.tdm` level file.
  #[argh(positional)]
  path: String,

  /// directory the level library lives in.
  #[argh(option, default = "String::from(\"levels\")")]
  library: String,
}

impl CmdPublish {
  fn run(&self) -> eyre::Result<()> {
    let level = load_level(&self.path)?;
    let par = validate::check_publishable(&level).map_err(|e| eyre!("{}", e))?;

    fs::create_dir_all(&self.library)?;
    let name = Path::new(&self.path)
      .file_name()
      .ok_or_else(|| eyre!("not a file: {}", self.path))?;
    let dest = Path::new(&self.library).join(name);
    fs::copy(&self.path, &dest)?;

    println!("published {:?} to {}", level.title(), dest.display());
    println!("par: {} / {}", par.no_break, par.with_break);
    Ok(())
  }
}

/// List the levels in the library with their par targets.
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "browse")]
struct CmdBrowse {
  /// directory the level library lives in.
  #[argh(option, default = "String::from(\"levels\")")]
  library: String,
}

impl CmdBrowse {
  fn run(&self) -> eyre::Result<()> {
    let mut paths = fs::read_dir(&self.library)?
      .filter_map(|entry| entry.ok().map(|e| e.path()))
      .filter(|p| p.extension().is_some_and(|ext| ext == "tdm"))
      .collect::<Vec<_>>();
    paths.sort();

    for path in paths {
      let file = fs::read_to_string(&path)?;
      match parse_to_level(&file) {
        Ok(level) => {
          // par is recomputed on load, not trusted from storage
          let par = level.maze().par(level.drill_budget());
          println!(
            "{:24} drills {:2}  par {}/{}  ({})",
            level.title(),
            level.drill_budget(),
            par.no_break,
            par.with_break,
            path.display()
          );
        }
        Err(e) => {
          println!("{} unreadable: {}", path.display(), e);
        }
      }
    }
    Ok(())
  }
}

fn load_level(path: &str) -> eyre::Result<Level> {
  let file = fs::read_to_string(path)?;
  let level = parse_to_level(&file).map_err(|e| eyre!("{}", e.to_string()))?;
  Ok(level)
}
