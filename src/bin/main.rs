use crossterm::style::Stylize;
use log::{Level, LevelFilter, Log, Metadata, Record};
use miileeniol::persistence::{load_from_disk, save_png, save_to_disk};
use miileeniol::raster::{BlockRasterizer, FontRasterizer, GlyphRasterizer, RasterCaptionFont};
use miileeniol::{Dictionary, LaidOutLine, ScriptVariant, Transliterator, TransliterationError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
Usage:
  miileeniol render --dict <PATH> --text <PATH> --out <PNG> [--legacy] [--report <JSON>]
                    [--font <TTF>] [--caption-font <TTF>]
  miileeniol compile --dict <PATH> --out <BIN> [--legacy]

A --dict path ending in .bin is read as a compiled dictionary.
Captions use --font when --caption-font is not given. Without any font,
glyphs are drawn as outlined placeholder cells.
Options: -v debug logging, -q warnings and errors only";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "error".red().bold(),
            Level::Warn => "warn".yellow().bold(),
            Level::Info => "info".green(),
            Level::Debug => "debug".blue(),
            Level::Trace => "trace".dark_grey(),
        };
        eprintln!("[{}] {}", level, record.args());
    }

    fn flush(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Render {
        text: PathBuf,
        report: Option<PathBuf>,
        font: Option<PathBuf>,
        caption_font: Option<PathBuf>,
    },
    Compile,
}

#[derive(Debug)]
struct Args {
    command: Command,
    dict: PathBuf,
    out: PathBuf,
    variant: ScriptVariant,
    level: LevelFilter,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let render = match raw.next().as_deref() {
        Some("render") => true,
        Some("compile") => false,
        Some(other) => return Err(format!("unknown command '{}'", other)),
        None => return Err("missing command".to_string()),
    };

    let (mut dict, mut text, mut out, mut report) = (None, None, None, None);
    let (mut font, mut caption_font) = (None, None);
    let mut variant = ScriptVariant::Current;
    let mut level = LevelFilter::Info;

    while let Some(arg) = raw.next() {
        let mut value = || raw.next().map(PathBuf::from).ok_or(format!("{} needs a value", arg));
        match arg.as_str() {
            "--dict" => dict = Some(value()?),
            "--text" => text = Some(value()?),
            "--out" => out = Some(value()?),
            "--report" => report = Some(value()?),
            "--font" => font = Some(value()?),
            "--caption-font" => caption_font = Some(value()?),
            "--legacy" => variant = ScriptVariant::Legacy,
            "-v" => level = LevelFilter::Debug,
            "-q" => level = LevelFilter::Warn,
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    let dict = dict.ok_or("--dict is required")?;
    let out = out.ok_or("--out is required")?;
    let command = if render {
        let text = text.ok_or("--text is required")?;
        Command::Render { text, report, font, caption_font }
    } else {
        Command::Compile
    };
    Ok(Args { command, dict, out, variant, level })
}

/// Reads either a source dictionary or a compiled one. A compiled
/// dictionary carries its own variant.
fn load_dictionary(path: &Path, variant: ScriptVariant) -> Result<(ScriptVariant, Dictionary), TransliterationError> {
    if path.extension().is_some_and(|ext| ext == "bin") {
        let (compiled_for, dictionary) = load_from_disk(path)?;
        if compiled_for != variant {
            log::warn!("{} was compiled for the {} script", path.display(), compiled_for.name());
        }
        Ok((compiled_for, dictionary))
    } else {
        Ok((variant, Dictionary::load(path, variant)?))
    }
}

fn rasterizer(font: Option<&Path>, role: &str) -> Result<Box<dyn GlyphRasterizer>, TransliterationError> {
    match font {
        Some(path) => {
            log::debug!("{} font: {}", role, path.display());
            Ok(Box::new(FontRasterizer::load(path)?))
        }
        None => {
            log::warn!("no {} font given; drawing placeholder cells", role);
            Ok(Box::new(BlockRasterizer))
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    variant: ScriptVariant,
    lines: &'a [LaidOutLine],
    overflowed: bool,
    missing: Vec<String>,
}

fn write_report(translit: &Transliterator, text: &str, path: &Path) -> Result<(), TransliterationError> {
    let outcome = translit.lay_out(text)?;
    let report = Report {
        variant: translit.variant(),
        lines: &outcome.lines,
        overflowed: outcome.overflowed,
        missing: outcome.omissions.iter().map(ToString::to_string).collect(),
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| TransliterationError::Io(e.into()))?;
    fs::write(path, json)?;
    log::info!("wrote layout report to {}", path.display());
    Ok(())
}

fn run(args: &Args) -> Result<(), TransliterationError> {
    let (variant, dictionary) = load_dictionary(&args.dict, args.variant)?;

    match &args.command {
        Command::Compile => save_to_disk(&dictionary, variant, &args.out),
        Command::Render { text, report, font, caption_font } => {
            let text = fs::read_to_string(text)?;
            let glyphs = rasterizer(font.as_deref(), "glyph")?;
            let translit = Transliterator::build(variant, dictionary, glyphs.as_ref())?;

            if let Some(report) = report {
                write_report(&translit, &text, report)?;
            }

            let caption_raster = match caption_font.as_deref() {
                Some(path) => rasterizer(Some(path), "caption")?,
                None => glyphs,
            };
            let captions = RasterCaptionFont::new(caption_raster, translit.config().caption_point_size);
            let page = translit.render_page(&text, &captions)?;
            if page.overflowed {
                log::warn!("text did not fit on one page; captions past the last line were not drawn");
            }
            save_png(&page.canvas, &args.out)
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}: {}\n\n{}", "error".red().bold(), message, USAGE);
            return ExitCode::from(2);
        }
    };

    if log::set_logger(Box::leak(Box::new(StderrLogger))).is_ok() {
        log::set_max_level(args.level);
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(TransliterationError::IncompleteDictionary { missing }) => {
            eprintln!("{}", "Missing from the dictionary:".red().bold());
            for omission in &missing {
                eprintln!("  {}", omission.to_string().red());
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Result<Args, String> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn render_needs_text() {
        assert!(args("render --dict d.csv --out p.png").is_err());
        let parsed = args("render --dict d.csv --text t.txt --out p.png --legacy -q").unwrap();
        assert_eq!(
            parsed.command,
            Command::Render { text: PathBuf::from("t.txt"), report: None, font: None, caption_font: None }
        );
        assert_eq!(parsed.variant, ScriptVariant::Legacy);
        assert_eq!(parsed.level, LevelFilter::Warn);
    }

    #[test]
    fn render_takes_font_paths() {
        let parsed =
            args("render --dict d.csv --text t.txt --out p.png --font mono.ttf --caption-font sans.ttf").unwrap();
        match parsed.command {
            Command::Render { font, caption_font, .. } => {
                assert_eq!(font, Some(PathBuf::from("mono.ttf")));
                assert_eq!(caption_font, Some(PathBuf::from("sans.ttf")));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(args("render --dict d.csv --text t.txt --out p.png --font").is_err());
    }

    #[test]
    fn missing_font_file_fails_the_render() {
        assert!(rasterizer(Some(Path::new("/nonexistent/mono.ttf")), "glyph").is_err());
        assert!(rasterizer(None, "glyph").is_ok());
    }

    #[test]
    fn compile_takes_dict_and_out() {
        let parsed = args("compile --dict d.csv --out d.bin").unwrap();
        assert_eq!(parsed.command, Command::Compile);
        assert_eq!(parsed.out, PathBuf::from("d.bin"));
        assert!(args("compile --dict").is_err());
        assert!(args("draw --dict d.csv").is_err());
    }
}
