use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wavescope", about = "Waveform overview, band colors and tempo for an audio file")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: PathBuf,

    /// Write the full analysis as JSON to this file ("-" for stdout)
    #[arg(short, long)]
    pub json: Option<PathBuf>,

    /// Number of overview segments
    #[arg(short, long, default_value_t = 1024)]
    pub resolution: usize,

    /// FFT window size for band colors (power of two)
    #[arg(long, default_value_t = 1024)]
    pub fft_size: usize,

    /// Onset averaging window, in segments
    #[arg(long, default_value_t = 10)]
    pub history: usize,

    /// Print detected onset times
    #[arg(long)]
    pub onsets: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Config file (defaults to ./wavescope.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
