use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use linebox::core::ansi::erase_display;
use linebox::{MouseState, RenderLines, RenderRect, WrapMode, WrapOptions, read_lines};

use crate::error::{CliError, Result};
use crate::regions::RegionReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WrapModeArg {
    /// Only split at embedded newlines.
    None,
    /// Break between words; long words get their own row.
    Word,
    /// Break at any character.
    Char,
    /// Break between words, splitting words that are too long.
    WordChar,
}

impl From<WrapModeArg> for WrapMode {
    fn from(arg: WrapModeArg) -> Self {
        match arg {
            WrapModeArg::None => Self::None,
            WrapModeArg::Word => Self::Word,
            WrapModeArg::Char => Self::Char,
            WrapModeArg::WordChar => Self::WordChar,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "linebox",
    about = "Render lines of text into a rectangle of the terminal",
    version
)]
pub struct Cli {
    /// Input file; reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Left column of the rectangle (0-based).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub x: i32,

    /// Top row of the rectangle (0-based).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub y: i32,

    /// Columns to wrap at; 0 or less disables wrapping.
    #[arg(long, env = "LINEBOX_WIDTH", default_value_t = 80, allow_negative_numbers = true)]
    pub width: i32,

    /// Rows available.
    #[arg(long, env = "LINEBOX_HEIGHT", default_value_t = 24, allow_negative_numbers = true)]
    pub height: i32,

    #[arg(long, value_enum, default_value_t = WrapModeArg::WordChar)]
    pub wrap_mode: WrapModeArg,

    /// Keep leading whitespace on wrapped continuation rows.
    #[arg(long)]
    pub preserve_indent: bool,

    /// Keep trailing whitespace on wrapped rows.
    #[arg(long)]
    pub no_trim_trailing: bool,

    /// Write the clickable regions as JSON to this path.
    #[arg(long, value_name = "PATH")]
    pub regions: Option<PathBuf>,

    /// Clear the screen before drawing.
    #[arg(long)]
    pub clear: bool,
}

impl Cli {
    #[must_use]
    pub fn wrap_options(&self) -> WrapOptions {
        WrapOptions::default()
            .mode(self.wrap_mode.into())
            .preserve_indent(self.preserve_indent)
            .trim_trailing(!self.no_trim_trailing)
    }

    #[must_use]
    pub fn rect(&self) -> RenderRect {
        RenderRect::new(self.x, self.y, self.width, self.height)
    }

    fn validate(&self) -> Result<()> {
        if self.regions.as_deref() == Some(Path::new("-")) {
            return Err(CliError::invalid(
                "--regions cannot write to stdout; stdout carries the rendered output",
            ));
        }
        Ok(())
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let lines = read_input(cli.file.as_deref())?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let report = render(&cli, &lines, &mut out)?;
    out.flush()?;

    if let Some(path) = &cli.regions {
        report.write_to(path)?;
        debug!(path = %path.display(), regions = report.regions.len(), "region report written");
    }
    Ok(())
}

/// Render `lines` as configured by `cli`, writing the bytes to `out`.
pub fn render<W: Write>(cli: &Cli, lines: &[String], out: &mut W) -> Result<RegionReport> {
    let renderer = RenderLines::new(cli.wrap_options());
    let mut mouse = MouseState::new();

    if cli.clear {
        erase_display(out)?;
    }
    let outcome = renderer.write_in_rectangle(out, lines, cli.rect(), &mut mouse)?;

    if !outcome.all_rendered {
        info!(
            final_y = outcome.final_y,
            height = cli.height,
            "output truncated to the rectangle height"
        );
    }
    Ok(RegionReport::new(&outcome, mouse.cell_regions()))
}

fn read_input(file: Option<&Path>) -> Result<Vec<String>> {
    match file {
        None => Ok(read_lines(io::stdin().lock())?),
        Some(path) if path == Path::new("-") => Ok(read_lines(io::stdin().lock())?),
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(read_lines(BufReader::new(file))?)
        }
    }
}
