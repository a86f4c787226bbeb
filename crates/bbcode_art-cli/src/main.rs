//! bbart - Turn images into BBCode color block art
//!
//! A command-line tool for converting images to BBCode markup and back.

use bbcode_art::{
    bbcode_decode, convert, convert_bytes, ConvertOptions, DEFAULT_GLYPH, DEFAULT_MAX_DIM,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bbart")]
#[command(version)]
#[command(about = "Turn images into BBCode color block art", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an image file to BBCode
    Encode {
        /// Input image file (PNG, JPEG, GIF, WebP, BMP)
        input: PathBuf,

        /// Output text file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum width/height in pixels (1-800, non-positive means default)
        #[arg(short, long, default_value_t = DEFAULT_MAX_DIM as i64, allow_negative_numbers = true)]
        max_dim: i64,

        /// Text used for one pixel (a single character is doubled)
        #[arg(short, long, default_value = DEFAULT_GLYPH)]
        glyph: String,
    },

    /// Encode a base64 or data URL payload to BBCode
    Payload {
        /// File holding the payload (use - for stdin)
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Output text file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum width/height in pixels (1-800, non-positive means default)
        #[arg(short, long, default_value_t = DEFAULT_MAX_DIM as i64, allow_negative_numbers = true)]
        max_dim: i64,

        /// Text used for one pixel (a single character is doubled)
        #[arg(short, long, default_value = DEFAULT_GLYPH)]
        glyph: String,
    },

    /// Decode BBCode art back to PNG
    Decode {
        /// Input BBCode file (use - for stdin)
        input: PathBuf,

        /// Output PNG file (default: input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glyph the art was encoded with
        #[arg(short, long, default_value = DEFAULT_GLYPH)]
        glyph: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            max_dim,
            glyph,
        } => {
            let bytes = fs::read(&input)
                .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?;
            let opts = ConvertOptions::new(max_dim, &glyph);

            log::info!(
                "Encoding '{}' with max dimension {} and glyph {:?}",
                input.display(),
                opts.max_dim,
                opts.glyph
            );

            let text = convert_bytes(&bytes, &opts)
                .map_err(|e| format!("Failed to convert '{}': {}", input.display(), e))?;
            write_output(output.as_deref(), &text)?;
        }

        Commands::Payload {
            input,
            output,
            max_dim,
            glyph,
        } => {
            let payload = read_input(&input)?;
            log::info!("Converting payload ({} bytes)", payload.len());

            let text = convert(payload.trim(), max_dim, &glyph)?;
            write_output(output.as_deref(), &text)?;
        }

        Commands::Decode {
            input,
            output,
            glyph,
        } => {
            let text = read_input(&input)?;
            let grid = bbcode_decode(&text, &glyph)?;

            let output_path = output.unwrap_or_else(|| {
                let mut p = input.clone();
                p.set_extension("png");
                p
            });
            grid.save(&output_path)?;

            log::info!(
                "Decoded: {}x{} pixels -> '{}'",
                grid.width(),
                grid.height(),
                output_path.display()
            );
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if input.to_string_lossy() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read_to_string(input)
            .map_err(|e| format!("Failed to read '{}': {}", input.display(), e))?)
    }
}

fn write_output(output: Option<&Path>, text: &str) -> io::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)?;
            log::info!("Written {} bytes to '{}'", text.len(), path.display());
        }
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
