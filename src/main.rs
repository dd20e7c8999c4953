// pixelstack: run the crop or prompt tool window on an image.
//
// crop:   drag the box, [ and ] zoom the preview, arrows/WASD nudge,
//         Enter or Done keeps the crop, Esc cancels (full image).
// prompt: pick a tool, click/drag on the image, arrows switch tools and
//         masks, Space toggles the alpha preview, Enter finishes.
//         Masks come from a built-in stand-in model (discs around prompts).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use pixelstack::config::Config;
use pixelstack::crop_ui::run_crop_ui;
use pixelstack::error::Error;
use pixelstack::prompt_ui::{Prediction, Prompts, run_prompt_ui};
use pixelstack::types::{FrameBuffer, MaskPredictions};
use pixelstack::window::{CancelToken, DisplayWindow};

#[derive(Parser, Debug)]
#[command(name = "pixelstack", version, about = "Crop and segmentation-prompt tool windows")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop an image interactively
    Crop(ToolArgs),
    /// Collect segmentation prompts on an image
    Prompt(ToolArgs),
}

#[derive(Args, Debug)]
struct ToolArgs {
    /// Image to open
    image: PathBuf,
    /// JSON config file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Window render height in pixels
    #[arg(long)]
    height: Option<usize>,
    /// Where to save the result (cropped image or selected mask)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ToolArgs {
    fn load(&self) -> Result<(FrameBuffer, Config), Error> {
        let image = FrameBuffer::open(&self.image)?;
        let cfg = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        Ok((image, cfg))
    }
}

const DEMO_MASK_PX: usize = 64;

/// Stand-in model: mask `i` is a disc of growing radius around each
/// foreground point and box center, minus discs around background points.
fn demo_predictor(prompts: &Prompts) -> Result<Prediction, Error> {
    let n = 4;
    let side = DEMO_MASK_PX;
    let mut centers: Vec<(f32, f32, f32)> = prompts.fg_points.iter().map(|p| (p.x, p.y, 1.0)).collect();
    centers.extend(prompts.boxes.iter().map(|b| ((b.xy1.x + b.xy2.x) / 2.0, (b.xy1.y + b.xy2.y) / 2.0, 1.0)));
    centers.extend(prompts.bg_points.iter().map(|p| (p.x, p.y, -1.0)));

    let mut scores = vec![-1.0f32; n * side * side];
    for i in 0..n {
        let radius = 0.08 + 0.06 * i as f32;
        let plane = &mut scores[i * side * side..(i + 1) * side * side];
        for (k, score) in plane.iter_mut().enumerate() {
            let (x, y) = ((k % side) as f32 / (side - 1) as f32, (k / side) as f32 / (side - 1) as f32);
            for &(cx, cy, sign) in &centers {
                let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                if d < radius {
                    *score = sign * (radius - d) / radius;
                }
            }
        }
    }
    let iou = (0..n).map(|i| 0.95 - 0.1 * i as f32).collect();
    Ok(Prediction { masks: MaskPredictions::new(n, side, side, scores)?, iou })
}

fn run_crop(args: &ToolArgs) -> Result<(), Error> {
    let (image, mut cfg) = args.load()?;
    if let Some(h) = args.height {
        cfg.crop.render_height = h;
    }
    let cancel = CancelToken::new();
    let mut window = DisplayWindow::new("Crop", cancel.clone());
    let crop = run_crop_ui(&image, &cfg.crop, &mut window, &cancel)?;
    window.close();

    println!("x: {}..{}  y: {}..{}", crop.x.start, crop.x.end, crop.y.start, crop.y.end);
    if let Some(path) = &args.output {
        crop.apply(&image).to_rgb_image().save(path)?;
        log::info!("saved crop to {}", path.display());
    }
    Ok(())
}

fn run_prompt(args: &ToolArgs) -> Result<(), Error> {
    let (image, mut cfg) = args.load()?;
    if let Some(h) = args.height {
        cfg.prompt.render_height = h;
    }
    let cancel = CancelToken::new();
    let mut window = DisplayWindow::new("Prompt", cancel.clone());
    let session = run_prompt_ui(&image, &cfg.prompt, &mut window, &cancel, demo_predictor)?;
    window.close();

    println!("{}", serde_json::to_string_pretty(&session.prompts)?);
    if let (Some(path), Some(mask)) = (&args.output, &session.mask) {
        mask.save(path)?;
        log::info!("saved mask {} to {}", session.mask_index, path.display());
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match &cli.command {
        Command::Crop(args) => run_crop(args),
        Command::Prompt(args) => run_prompt(args),
    }
}
