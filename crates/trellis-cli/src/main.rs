use std::io::Read;
use std::str::FromStr;
use trellis::geom;
use trellis::layout::{LayoutOptions, layout_state};
use trellis::raster::{self, RasterOptions};
use trellis::render::{RenderProps, render_svg};
use trellis::{DiagramConfig, DiagramState, PersistedDiagram};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Trellis(trellis::Error),
    Raster(raster::RasterError),
    Json(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Trellis(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Invalid(msg) => write!(f, "invalid document: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<trellis::Error> for CliError {
    fn from(value: trellis::Error) -> Self {
        Self::Trellis(value)
    }
}

impl From<raster::RasterError> for CliError {
    fn from(value: raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
    Validate,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    viewport_width: f64,
    viewport_height: f64,
    out: Option<String>,
}

fn usage() -> &'static str {
    "trellis-cli\n\
\n\
USAGE:\n\
  trellis-cli [layout] [--pretty] [--config <path>] [--viewport-width <w>] [--viewport-height <h>] [<path>|-]\n\
  trellis-cli render [--format svg|png] [--scale <n>] [--background <css-color>] [--config <path>] [--viewport-width <w>] [--viewport-height <h>] [--out <path>] [<path>|-]\n\
  trellis-cli validate [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a saved diagram: {\"tasks\": [...], \"dependencies\": [...]}.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --config takes a JSON object of overrides merged onto the default configuration.\n\
  - layout prints the document with computed positions.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
  - Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "validate" => args.command = Command::Validate,
            "--pretty" => args.pretty = true,
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--viewport-width" => args.viewport_width = parse_extent(next_value(&mut it)?)?,
            "--viewport-height" => args.viewport_height = parse_extent(next_value(&mut it)?)?,
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "-" => set_input(&mut args, "-")?,
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => set_input(&mut args, path)?,
        }
    }

    Ok(args)
}

fn parse_extent(text: &str) -> Result<f64, CliError> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(CliError::Usage(usage())),
    }
}

fn set_input(args: &mut Args, path: &str) -> Result<(), CliError> {
    if args.input.is_some() {
        return Err(CliError::Usage(usage()));
    }
    args.input = Some(path.to_string());
    Ok(())
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>) -> Result<DiagramConfig, CliError> {
    let mut config = DiagramConfig::default();
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)?;
        let overrides: serde_json::Value = serde_json::from_str(&text)?;
        config.merge_json(&overrides)?;
    }
    Ok(config)
}

fn load_document(text: &str) -> Result<PersistedDiagram, CliError> {
    PersistedDiagram::from_json_str(text).map_err(|err| match err {
        trellis::Error::InvalidDocument { message } => CliError::Invalid(message),
        other => CliError::Trellis(other),
    })
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn laid_out(args: &Args, config: &DiagramConfig, doc: PersistedDiagram) -> DiagramState {
    let viewport = geom::viewport(args.viewport_width, args.viewport_height);
    let (state, outcome) = layout_state(&doc.into_state(), viewport, &LayoutOptions::from(config));
    if outcome.is_cyclic() {
        let ids: Vec<&str> = outcome.cyclic.iter().map(|id| id.as_str()).collect();
        tracing::warn!(tasks = ?ids, "cyclic tasks kept their stored positions");
    }
    state
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Validate => {
            let doc = load_document(&text)?;
            let (tasks, dependencies) = (doc.tasks.len(), doc.dependencies.len());
            let state = doc.into_state();
            println!(
                "ok: {} tasks, {} dependencies",
                state.tasks.len(),
                state.dependencies.len()
            );
            let dropped = (tasks - state.tasks.len()) + (dependencies - state.dependencies.len());
            if dropped > 0 {
                println!("note: {dropped} duplicate or dangling entries would be dropped on restore");
            }
            Ok(())
        }
        Command::Layout => {
            let config = load_config(args.config.as_deref())?;
            let state = laid_out(&args, &config, load_document(&text)?);
            let doc = PersistedDiagram::from_state(&state);
            let json = if args.pretty {
                doc.to_json_string_pretty()?
            } else {
                doc.to_json_string()?
            };
            println!("{json}");
            Ok(())
        }
        Command::Render => {
            let config = load_config(args.config.as_deref())?;
            let state = laid_out(&args, &config, load_document(&text)?);
            let viewport = geom::viewport(args.viewport_width, args.viewport_height);
            let props = RenderProps::from_state(&state, viewport, &config.geometry);

            match args.render_format {
                RenderFormat::Svg => {
                    let svg = render_svg(&props, &config.render);
                    write_text(&svg, args.out.as_deref())
                }
                RenderFormat::Png => {
                    let options = RasterOptions {
                        scale: args.render_scale,
                        background: args.background.clone(),
                    };
                    let bytes = raster::render_png(&props, &config.render, &options)?;
                    let out = match args.out.as_deref() {
                        Some(path) => std::path::PathBuf::from(path),
                        None => default_raster_out_path(args.input.as_deref(), "png"),
                    };
                    std::fs::write(&out, bytes)?;
                    tracing::info!(path = %out.display(), "wrote PNG");
                    Ok(())
                }
            }
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::Invalid(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
