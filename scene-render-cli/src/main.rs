use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, ValueEnum};
use scene_render::output::resolve_dimensions;
use scene_render::scene_canvas::FontConfig;
use scene_render::{
    compile, encode_with_options, OutputKind, OutputSpec, RenderOptions, SceneDocument,
};

/// scene-render: render a JSON scene to PNG, PostScript, PDF or SVG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Args {
    /// Path to the scene JSON file (standard input when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to the output file; its extension selects the format
    #[arg(short, long, required_unless_present = "list")]
    output: Option<PathBuf>,

    /// Output width. Derived from the height and the scene's aspect ratio when omitted
    #[arg(short, long)]
    width: Option<f64>,

    /// Output height. Derived from the width and the scene's aspect ratio when omitted
    #[arg(short = 'h', long)]
    height: Option<f64>,

    /// Name of the scene to render from a collection of named scenes
    #[arg(short, long)]
    selection: Option<String>,

    /// Output format, overriding the output file extension
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Draw scene coordinates as-is instead of fitting the scene to the output
    #[arg(long)]
    bypass_adjust: bool,

    /// Print the names of the scenes in the input and exit
    #[arg(long)]
    list: bool,

    /// Additional directory to search for fonts (repeatable)
    #[arg(long)]
    font_dir: Vec<PathBuf>,

    /// Do not load system fonts
    #[arg(long)]
    no_system_fonts: bool,

    /// Pixels per inch recorded in PNG output
    #[arg(long, default_value_t = 72.0)]
    ppi: f32,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Png,
    Ps,
    Pdf,
    Svg,
}

impl From<Format> for OutputKind {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => OutputKind::Png,
            Format::Ps => OutputKind::Ps,
            Format::Pdf => OutputKind::Pdf,
            Format::Svg => OutputKind::Svg,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn read_scene(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read scene from standard input")?;
            Ok(json)
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let json = read_scene(args.input.as_ref())?;
    let document = SceneDocument::from_json(&json).context("Failed to parse scene")?;

    if args.list {
        for name in document.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let Some(output) = args.output else {
        bail!("An output file is required");
    };
    let kind = match args.format {
        Some(format) => format.into(),
        None => OutputKind::from_extension(&output)?,
    };
    let node = document.select(args.selection.as_deref())?;

    let procedure = compile(node);
    let (width, height) = resolve_dimensions(args.width, args.height, procedure.bounds());
    let spec = OutputSpec {
        destination: Some(output),
        kind,
        width,
        height,
        bypass_adjust: args.bypass_adjust,
    };
    let options = RenderOptions {
        font_config: FontConfig {
            load_system_fonts: !args.no_system_fonts,
            font_dirs: args.font_dir,
            ..FontConfig::default()
        },
        ppi: args.ppi,
    };

    let rendered = encode_with_options(&spec, procedure, &options)?;
    if let Some(path) = rendered.output {
        log::info!("Rendered {} ({}x{}) to {}", kind, width, height, path.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(err) = run(args) {
        eprintln!("scene-render: {:#}", err);
        std::process::exit(1);
    }
}
