use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use sandpile_bmp::{
	bmp,
	output,
	png,
	Categories,
	Color,
	Result,
	Sandpile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
	Bmp,
	Png,
}

impl Format {
	fn extension(self) -> &'static str {
		match self {
			Format::Bmp => "bmp",
			Format::Png => "png",
		}
	}
}

#[derive(Debug, Parser)]
#[command(name = "sandpile-bmp")]
#[command(about = "Topple an abelian sandpile until it is stable, saving snapshots as images")]
struct Config {
	/// Input file of whitespace-separated `x y grains` triples
	#[arg(short, long)]
	input: PathBuf,

	/// Base directory; each run gets its own subdirectory here
	#[arg(short, long)]
	output: PathBuf,

	/// Stop after this many updates even if the pile is still unstable
	#[arg(short, long)]
	max_iter: Option<u64>,

	/// Save a snapshot every N updates (0 = only the final state)
	#[arg(short, long)]
	freq: u64,

	/// Color for cells with 0 grains
	#[arg(long, visible_alias = "c0", value_enum, default_value_t = Color::White)]
	color0: Color,

	/// Color for cells with 1 grain
	#[arg(long, visible_alias = "c1", value_enum, default_value_t = Color::Green)]
	color1: Color,

	/// Color for cells with 2 grains
	#[arg(long, visible_alias = "c2", value_enum, default_value_t = Color::Purple)]
	color2: Color,

	/// Color for cells with 3 grains
	#[arg(long, visible_alias = "c3", value_enum, default_value_t = Color::Yellow)]
	color3: Color,

	/// Color for cells with more than 3 grains
	#[arg(long, visible_alias = "c4", value_enum, default_value_t = Color::Black)]
	color4: Color,

	/// Image format of the snapshots
	#[arg(long, value_enum, default_value_t = Format::Bmp)]
	format: Format,

	/// Also print the final state to stdout
	#[arg(long)]
	ascii: bool,
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let config = Config::parse();
	if let Err(e) = run(&config) {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

fn run(config: &Config) -> Result<()> {
	let mut pile = Sandpile::from_path(&config.input)?;
	log::info!("Loaded {}x{} grid with {} grains", pile.width(), pile.height(), pile.total_grains());

	let dir = output::create_run_dir(&config.output, &config.input)?;
	log::info!("Writing results to {}", dir.display());

	let colors = [config.color0, config.color1, config.color2, config.color3, config.color4];
	log::debug!(
		"Colors for 0, 1, 2, 3, 4+ grains: {}, {}, {}, {}, {}",
		colors[0], colors[1], colors[2], colors[3], colors[4]
	);
	let categories = Categories::from_colors(colors);
	let save = |pile: &Sandpile, name: &str| -> Result<()> {
		let path = dir.join(format!("{}.{}", name, config.format.extension()));
		write_image(&path, config.format, pile, &categories)?;
		log::info!("Saved {} ({}x{})", path.display(), pile.width(), pile.height());
		Ok(())
	};

	if config.freq != 0 {
		save(&pile, "state_0")?;
	}
	let snapshot_due = |iter: u64| config.freq > 0 && iter % config.freq == 0;
	let mut iter = 0;
	match config.max_iter {
		Some(max_iter) => {
			while iter < max_iter {
				iter += 1;
				pile.update()?;
				if snapshot_due(iter) {
					save(&pile, &format!("state_{}", iter))?;
				}
				if pile.is_stable() {
					break;
				}
			}
			if !pile.is_stable() {
				log::warn!("Stopped after {} iterations before reaching a stable state", iter);
			}
		},
		None => {
			while !pile.is_stable() {
				iter += 1;
				pile.update()?;
				if snapshot_due(iter) {
					save(&pile, &format!("state_{}", iter))?;
				}
			}
		},
	}
	log::info!(
		"Finished after {} iterations, {} topples, final grid {}x{}",
		iter, pile.topples(), pile.width(), pile.height()
	);

	save(&pile, "final_state")?;
	if config.ascii {
		print!("{}", pile);
	}
	Ok(())
}

fn write_image(path: &Path, format: Format, pile: &Sandpile, categories: &Categories) -> Result<()> {
	let pixels = pile.category_grid(categories);
	match format {
		Format::Bmp => bmp::write(path, &pixels)?,
		Format::Png => png::write(path, &pixels)?,
	}
	Ok(())
}
