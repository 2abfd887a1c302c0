use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use qrcode::EcLevel;
use qrstamp_business::{PlacementRect, QrSettings};

#[derive(Parser)]
#[command(name = "qrstamp")]
#[command(about = "Stamp QR codes onto images and PDF templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub qr: QrArgs,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one stamped copy of an image or PDF per link
    Place {
        /// Image or PDF to stamp
        #[arg(long, short = 's')]
        source: PathBuf,

        /// Placement rectangle in source pixels/points: x1,y1,x2,y2
        #[arg(long, short = 'r')]
        rect: PlacementRect,

        /// Directory for output_image_<n>.png / output_pdf_<n>.pdf
        #[arg(long, short = 'o', default_value = ".")]
        output_dir: PathBuf,

        /// Read links from a file, one per line
        #[arg(long, short = 'f', conflicts_with = "links")]
        links_file: Option<PathBuf>,

        /// Links to encode (read from stdin when omitted and input is piped)
        links: Vec<String>,
    },
    /// Merge a CSV roster (Link, Name, Amount) with a PDF template
    Batch {
        /// PDF template; its first page is repeated
        #[arg(long, short = 't')]
        template: PathBuf,

        /// CSV roster with Link, Name and Amount columns
        #[arg(long, short = 'c')]
        roster: PathBuf,

        /// Placement rectangle in PDF points from the top-left: x1,y1,x2,y2
        #[arg(long, short = 'r')]
        rect: PlacementRect,

        /// Combined output PDF
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

const MAX_BORDER: i64 = 64;
const MAX_MODULE_PX: i64 = 100;

/// QR rendering options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct QrArgs {
    /// Light modules around the symbol
    #[arg(
        long,
        global = true,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(..=MAX_BORDER)
    )]
    pub border: u32,

    /// Error correction level
    #[arg(long, global = true, value_enum, default_value_t = EcLevelArg::L)]
    pub ec_level: EcLevelArg,

    /// Pixels per module before the code is fitted into the rectangle
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=MAX_MODULE_PX)
    )]
    pub module_px: u32,
}

impl QrArgs {
    pub fn settings(&self) -> QrSettings {
        QrSettings {
            ec_level: self.ec_level.into(),
            border: self.border,
            module_px: self.module_px,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EcLevelArg {
    L,
    M,
    Q,
    H,
}

impl From<EcLevelArg> for EcLevel {
    fn from(level: EcLevelArg) -> Self {
        match level {
            EcLevelArg::L => Self::L,
            EcLevelArg::M => Self::M,
            EcLevelArg::Q => Self::Q,
            EcLevelArg::H => Self::H,
        }
    }
}
