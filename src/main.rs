// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use clap::Parser;
use fft2d_filter::{DisplayPoint, FilterConfig, FilterSession, MaskMode, Selection};

/// Filter a grayscale image by masking its Fourier spectrum.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to filter, converted to gray levels.
    input: PathBuf,

    /// Where to write the filtered image.
    output: PathBuf,

    /// Mask: none, circle-inside, circle-outside, rectangle-inside, rectangle-outside or custom.
    #[arg(short, long, default_value = "none")]
    mask: Selection,

    /// Size of the predefined shapes, within [0, 1].
    #[arg(short, long)]
    size: Option<f64>,

    /// Display position `x,y` to paint on a custom mask, can be repeated.
    #[arg(short, long = "paint")]
    paint: Vec<DisplayPoint>,

    /// Brush radius for painted points.
    #[arg(short, long)]
    brush: Option<u32>,

    /// Also write the masked spectrum magnitude to this file.
    #[arg(long)]
    spectrum: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FilterConfig::load_from_file(path)?,
        None => FilterConfig::default(),
    };
    let mut session = FilterSession::new(config);

    session.on_image_loaded(&args.input)?;
    if let Some(size) = args.size {
        session.on_size_changed(size)?;
    }
    session.on_shape_selected(args.mask)?;

    if !args.paint.is_empty() {
        if session.mode() != MaskMode::Custom {
            log::warn!("painted points are ignored without `--mask custom`");
        } else {
            let brush = args.brush.unwrap_or(session.brush_radius());
            session.on_paint_gesture(&args.paint, brush)?;
        }
    }

    session.on_save_requested(&args.output)?;
    if let Some(path) = &args.spectrum {
        session.save_spectrum_view(path)?;
    }
    Ok(())
}
