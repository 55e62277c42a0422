use crate::config::PuzzleConfig;
use crate::controller::GameMode;
use crate::grid::GridSize;
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageError};
use std::path::PathBuf;
use structopt::clap::Shell;
use structopt::StructOpt;
use structopt_flags::QuietVerbose;

fn load_image(s: &str) -> Result<DynamicImage, ImageError> {
    let path = PathBuf::from(s);
    let image = ImageReader::open(path)?.decode()?;
    Ok(image)
}

#[derive(Debug)]
pub struct WindowConfig {
    pub vsync: bool,
    pub fullscreen: bool,
}

#[derive(Debug)]
pub struct AppConfig {
    pub puzzle: PuzzleConfig,
    pub mode: GameMode,
    pub image: Option<DynamicImage>,
    pub font: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub window: WindowConfig,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "Sliding Puzzle",
    about = "Slide numbered or picture tiles back into order"
)]
pub struct Opt {
    #[structopt(flatten)]
    pub verbose: QuietVerbose,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        default_value = "number",
        help = "Tile mode: number or image"
    )]
    mode: GameMode,

    #[structopt(
        parse(try_from_str),
        short,
        long,
        default_value = "3",
        help = "Board size, e.g. 4 or 4x4"
    )]
    grid_size: GridSize,

    #[structopt(parse(try_from_str=load_image), short, long, help = "Picture for image mode")]
    image: Option<DynamicImage>,

    #[structopt(parse(from_os_str), long, help = "TrueType font for tile numbers")]
    font: Option<PathBuf>,

    #[structopt(long, help = "Hide numbers on picture tiles")]
    no_numbers: bool,

    #[structopt(parse(try_from_str), short, long, help = "Random seed")]
    seed: Option<u64>,

    #[structopt(long, default_value = "500", help = "Largest board side in pixels")]
    max_size: u32,

    #[structopt(long, default_value = "1000", help = "Random moves used to shuffle")]
    shuffle_moves: usize,

    #[structopt(
        parse(from_os_str),
        long,
        help = "Render the dealt board to a PNG instead of opening a window"
    )]
    snapshot: Option<PathBuf>,

    #[structopt(long, help = "Turns on vsync")]
    vsync: bool,

    #[structopt(short, long, help = "Runs the application in full screen")]
    fullscreen: bool,

    #[structopt(long, possible_values= &Shell::variants(), case_insensitive = true, help = "Generate shell completions and exit")]
    pub completions: Option<Shell>,
}

impl Opt {
    pub fn to_app_config(self) -> Result<AppConfig, &'static str> {
        if self.mode == GameMode::Image && self.image.is_none() {
            return Err("Image mode needs --image");
        }

        if self.max_size == 0 {
            return Err("Max size must be positive");
        }

        Ok(AppConfig {
            puzzle: PuzzleConfig {
                grid_size: self.grid_size.0,
                shuffle_moves: self.shuffle_moves,
                max_dimension: self.max_size,
                seed: self.seed,
                image_numbers: !self.no_numbers,
            },
            mode: self.mode,
            image: self.image,
            font: self.font,
            snapshot: self.snapshot,
            window: WindowConfig {
                vsync: self.vsync,
                fullscreen: self.fullscreen,
            },
        })
    }
}
