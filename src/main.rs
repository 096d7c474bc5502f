#[cfg(target_arch = "wasm32")]
fn main() {
    healthhub::wasm::mount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

/// Headless runner for dispatcher levels and lesson manifests, handy for
/// checking custom content before shipping it to the web build.
#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use healthhub::{
        Coord, Direction, GameConfig, LessonCatalog, Level, Outcome, builtin_levels, simulate,
    };
    use tracing::{info, warn};

    #[derive(Parser, Debug)]
    #[command(
        name = "healthhub",
        about = "Play health dispatcher commands against a level without the browser"
    )]
    struct Args {
        /// JSON game configuration; missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Level number, starting at 1
        #[arg(long, default_value_t = 1)]
        level: usize,

        /// Print every level board and exit
        #[arg(long)]
        list: bool,

        /// Load a lesson `index.json` manifest, print its lessons and exit
        #[arg(long, value_name = "MANIFEST")]
        lessons: Option<PathBuf>,

        /// Moves to play: UP, DOWN, LEFT or RIGHT
        commands: Vec<String>,
    }

    pub fn run() -> Result<()> {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("healthhub=info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();

        let args = Args::parse();
        if let Some(manifest) = &args.lessons {
            return print_lessons(manifest);
        }

        let config = match &args.config {
            Some(path) => GameConfig::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => GameConfig::default(),
        };

        let levels = config
            .dispatcher
            .levels
            .clone()
            .unwrap_or_else(builtin_levels);

        if args.list {
            for level in &levels {
                println!("Level {}", level.id());
                println!("{}", render_board(level, level.start()));
            }
            return Ok(());
        }

        let Some(level) = args.level.checked_sub(1).and_then(|index| levels.get(index)) else {
            bail!(
                "level {} does not exist (there are {})",
                args.level,
                levels.len()
            );
        };

        let commands: Vec<Direction> = args
            .commands
            .iter()
            .filter_map(|token| {
                let direction = Direction::from_token(token);
                if direction.is_none() {
                    warn!(token = token.as_str(), "skipping unknown command");
                }
                direction
            })
            .collect();

        let report = simulate(level, &commands);
        info!(
            level = level.id(),
            executed = report.executed,
            queued = commands.len(),
            "run finished"
        );

        println!("{}", render_board(level, report.final_position));
        let path: Vec<String> = report.path.iter().map(Coord::to_string).collect();
        println!("path: {}", path.join(" -> "));
        match report.outcome {
            Outcome::Succeeded => println!("{}", healthhub::dispatcher::SUCCESS_MESSAGE),
            Outcome::Failed(failure) => {
                println!("{} ({failure:?})", healthhub::dispatcher::FAILURE_MESSAGE)
            }
        }

        Ok(())
    }

    fn print_lessons(manifest: &Path) -> Result<()> {
        let catalog = LessonCatalog::from_manifest_file(manifest)
            .with_context(|| format!("loading lessons from {}", manifest.display()))?;

        for entry in catalog.entries() {
            println!(
                "[{}] {} - {} ({} steps)",
                entry.category_path(),
                entry.lesson.id,
                entry.lesson.title,
                entry.lesson.steps.len()
            );
        }
        let stats = catalog.stats();
        println!(
            "{} lessons, {} steps, {} with video",
            stats.lessons, stats.steps, stats.with_video
        );

        Ok(())
    }

    fn render_board(level: &Level, robot: Coord) -> String {
        let mut board = String::new();
        for y in 0..level.size() {
            for x in 0..level.size() {
                let cell = Coord::new(x, y);
                let glyph = if cell == robot {
                    'R'
                } else if cell == level.end() {
                    'P'
                } else if level.is_obstacle(cell) {
                    'X'
                } else {
                    '.'
                };
                board.push(glyph);
            }
            if y + 1 < level.size() {
                board.push('\n');
            }
        }
        board
    }
}
