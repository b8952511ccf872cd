use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use watermarker::{
    Config, codec,
    font::load_font,
    job::{WatermarkJob, find_text_file, read_watermark_text, watermark_file},
    log_filter,
    watermark::{Corner, HexColor, suggest_font_size, suggest_padding},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "watermark.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark a single image
    Apply(ApplyArgs),

    /// Print the suggested font size and padding for an image
    Suggest {
        /// Image to inspect
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ApplyArgs {
    /// Image to watermark
    input: PathBuf,

    /// Where to write the result (same format as the input)
    output: PathBuf,

    /// Watermark text; defaults to the contents of a sibling .txt file
    #[arg(short, long)]
    text: Option<String>,

    /// Read the watermark text from this file
    #[arg(long, conflicts_with = "text")]
    text_file: Option<PathBuf>,

    /// Logo image, ideally a PNG with transparency
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Font family name or path to a font file
    #[arg(long)]
    font: Option<String>,

    #[arg(long)]
    font_size: Option<u32>,

    /// Size text and padding from the image width
    #[arg(long)]
    auto_size: bool,

    /// Text fill color as #RRGGBB
    #[arg(long)]
    text_color: Option<HexColor>,

    /// Text outline color as #RRGGBB
    #[arg(long)]
    outline_color: Option<HexColor>,

    /// Outline width in pixels, 0 disables it
    #[arg(long)]
    outline_width: Option<u32>,

    #[arg(long, value_enum)]
    text_corner: Option<Corner>,

    #[arg(long)]
    text_padding: Option<u32>,

    /// Logo width as a fraction of the image width
    #[arg(long)]
    logo_scale: Option<f32>,

    #[arg(long, value_enum)]
    logo_corner: Option<Corner>,

    #[arg(long)]
    logo_padding: Option<u32>,

    /// JPEG output quality
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first; RUST_LOG wins over --log-level
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(&cli.log_level));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(&cli.config)?;

    let result = match cli.command {
        Commands::Apply(args) => run_apply(config, args),
        Commands::Suggest { input } => run_suggest(input),
    };

    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}

fn run_apply(mut config: Config, args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Command line flags win over the config file
    let text_settings = &mut config.text;
    if let Some(font) = args.font {
        text_settings.font = font;
    }
    if let Some(font_size) = args.font_size {
        text_settings.font_size = font_size;
    }
    if let Some(color) = args.text_color {
        text_settings.color = color;
    }
    if let Some(color) = args.outline_color {
        text_settings.outline_color = color;
    }
    if let Some(width) = args.outline_width {
        text_settings.outline_width = width;
    }
    if let Some(corner) = args.text_corner {
        text_settings.corner = corner;
    }
    if let Some(padding) = args.text_padding {
        text_settings.padding = padding;
    }
    text_settings.auto_size |= args.auto_size;

    let logo_settings = &mut config.logo;
    if args.logo.is_some() {
        logo_settings.path = args.logo;
    }
    if let Some(scale) = args.logo_scale {
        logo_settings.scale_factor = scale;
    }
    if let Some(corner) = args.logo_corner {
        logo_settings.corner = corner;
    }
    if let Some(padding) = args.logo_padding {
        logo_settings.padding = padding;
    }

    let quality = args.quality.unwrap_or(config.output.jpeg_quality);

    let text = match (args.text, args.text_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => read_watermark_text(&path)?,
        (None, None) => match find_text_file(&args.input) {
            Some(path) => read_watermark_text(&path)?,
            None => None,
        },
    };

    if config.text.auto_size && text.is_some() {
        let (image, _) = codec::load_image(&args.input)?;
        config.text.font_size = suggest_font_size(&image)?;
        config.text.padding = suggest_padding(&image)?;
        info!(
            "Using suggested font size {} and padding {}",
            config.text.font_size, config.text.padding
        );
    }

    let job = WatermarkJob {
        text: text.map(|text| {
            let font = load_font(&config.text.font);
            config.text.to_spec(text, font)
        }),
        logo: config.logo.to_spec()?,
    };

    if job.is_empty() {
        return Err("nothing to do: no text and no logo were provided".into());
    }

    watermark_file(&args.input, &args.output, &job, quality)?;
    Ok(())
}

fn run_suggest(input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (image, format) = codec::load_image(&input)?;
    let font_size = suggest_font_size(&image)?;
    let padding = suggest_padding(&image)?;

    let suggestion = serde_json::json!({
        "width": image.width(),
        "height": image.height(),
        "format": format!("{:?}", format),
        "font_size": font_size,
        "padding": padding,
    });

    println!("{}", serde_json::to_string_pretty(&suggestion)?);
    Ok(())
}
