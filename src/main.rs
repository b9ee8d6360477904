use clap::{Parser, Subcommand};
use loom_punchcards::card::CardType;
use loom_punchcards::config::{self, CONFIG_FILE_NAME, PunchcardConfig};
use loom_punchcards::export::ExportFormat;
use loom_punchcards::export::text::{DEFAULT_TITLE, TextParser};
use loom_punchcards::imaging::{ColorMode, RustBackend};
use loom_punchcards::metadata::{InfoReport, generate_metadata};
use loom_punchcards::output;
use loom_punchcards::pipeline::{self, PipelineOptions, RenderOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "punchcards")]
#[command(about = "Convert images into Jacquard loom punchcards")]
#[command(long_about = "\
Convert images into Jacquard loom punchcards

The image is reduced to grayscale, resampled so one image row fills one card,
Floyd-Steinberg dithered to black and white, and cut into fixed-size cards.
Dark pixels become punched holes (raised threads).

Card types:

  26x8    26 columns x 8 rows, 208 holes (image resampled to 208 px wide)
  50x12   50 columns x 12 rows, 600 holes (image resampled to 600 px wide)

Outputs:

  svg     one document with every card stacked vertically, sized in mm
  text    editable '#'/'.' grid that 'punchcards parse' reads back

Run 'punchcards gen-config' to generate a documented punchcards.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./punchcards.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more detail to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Image processing flags shared by `convert` and `info`.
#[derive(clap::Args, Clone)]
struct CardArgs {
    /// Dithering levels: 2, 4 or 8
    #[arg(long, value_parser = parse_color_mode)]
    color_mode: Option<ColorMode>,

    /// Card type: 26x8 or 50x12
    #[arg(long)]
    card_type: Option<CardType>,

    /// Swap holes and blanks on every card
    #[arg(long)]
    invert: bool,
}

fn parse_color_mode(s: &str) -> Result<ColorMode, String> {
    let levels: u32 = s.parse().map_err(|_| format!("not a number: {s}"))?;
    ColorMode::try_from(levels).map_err(|e| e.to_string())
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image into a punchcard document
    Convert {
        /// Source image (PNG, JPEG, GIF, TIFF, WebP)
        image: PathBuf,

        /// Output format: svg or text
        #[arg(short, long, default_value = "svg")]
        format: ExportFormat,

        #[command(flatten)]
        card: CardArgs,

        /// Pattern title shown on every card
        #[arg(long)]
        title: Option<String>,

        /// Only write the first N cards (preview)
        #[arg(long)]
        max_cards: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print card statistics for an image
    Info {
        /// Source image
        image: PathBuf,

        #[command(flatten)]
        card: CardArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a text punchcard file, optionally re-exporting it
    Parse {
        /// Text file written by `convert --format text`
        file: PathBuf,

        /// Expected card type (default: detected from the header)
        #[arg(long)]
        card_type: Option<CardType>,

        /// Re-export the parsed cards in this format
        #[arg(long)]
        to: Option<ExportFormat>,

        /// Title for --to (default: the file's own title)
        #[arg(long)]
        title: Option<String>,

        /// Output file for --to (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a stock punchcards.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PunchcardConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config(path, true),
        None => config::load_config(Path::new(CONFIG_FILE_NAME), false),
    }
}

/// Config values with command-line overrides applied.
fn pipeline_options(config: &PunchcardConfig, args: &CardArgs) -> PipelineOptions {
    let mut options = config.pipeline_options();
    if let Some(mode) = args.color_mode {
        options.color_mode = mode;
    }
    if let Some(card_type) = args.card_type {
        options.dimensions = card_type.dimensions();
    }
    options.invert |= args.invert;
    options
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> std::io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, bytes),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert {
            image,
            format,
            card,
            title,
            max_cards,
            output: out_path,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let options = pipeline_options(&config, &card);
            let render_options = RenderOptions {
                format,
                title: title.or_else(|| config.title.clone()),
                max_cards,
                svg: config.svg_exporter(),
                text: config.text_exporter(),
            };
            let bytes = std::fs::read(&image)?;
            let conversion =
                pipeline::convert(&RustBackend::new(), &bytes, &options, &render_options)?;
            write_output(out_path.as_deref(), &conversion.document)?;
            if let Some(path) = &out_path {
                let written = max_cards.map_or(conversion.cards.len(), |n| {
                    n.min(conversion.cards.len())
                });
                output::print_convert_output(
                    &image,
                    path,
                    options.color_mode,
                    &conversion.metadata,
                    written,
                );
            }
        }
        Command::Info { image, card, json } => {
            let config = load_config(cli.config.as_deref())?;
            let options = pipeline_options(&config, &card);
            let bytes = std::fs::read(&image)?;
            let cards = pipeline::image_to_cards(&RustBackend::new(), &bytes, &options)?;
            let report = InfoReport::new(
                file_name(&image),
                options.color_mode,
                &generate_metadata(&cards),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_info_output(&report);
            }
        }
        Command::Parse {
            file,
            card_type,
            to,
            title,
            output: out_path,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let parser = match (card_type, config.card.width.zip(config.card.height)) {
                (Some(card_type), _) => TextParser::with_dimensions(card_type.dimensions()),
                (None, Some(_)) => TextParser::with_dimensions(config.card.dimensions()),
                (None, None) => TextParser::new(),
            };
            let content = std::fs::read_to_string(&file)?;
            let deck = parser.parse(&content)?;
            match to {
                Some(format) => {
                    let render_options = RenderOptions {
                        format,
                        title: title
                            .or_else(|| (deck.title != DEFAULT_TITLE).then(|| deck.title.clone()))
                            .or_else(|| config.title.clone()),
                        max_cards: None,
                        svg: config.svg_exporter(),
                        text: config.text_exporter(),
                    };
                    let document = pipeline::render(&deck.cards, &render_options)?;
                    write_output(out_path.as_deref(), &document)?;
                }
                None => output::print_parse_output(&deck),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
