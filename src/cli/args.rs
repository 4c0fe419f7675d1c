// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::io::FrameFormat;
use crate::render::DEFAULT_JOINT_RADIUS;

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Sources:
    demo                     Built-in COCO-17 animation (used when --source is missing)
    path/to/pose.json        Local JSON pose document
    file:///abs/pose.json    Local file URL
    https://host/pose.json   Remote JSON pose document

Examples:
    pose-viewer render --source walk.json
    pose-viewer render -s walk.json --frame 12 --format png
    pose-viewer render -s walk.json --all --output frames/
    pose-viewer play -s https://example.com/walk.json --loops 3
    pose-viewer play -s walk.json --fps 10 --save
    pose-viewer play --show
    pose-viewer inspect -s walk.json"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one frame or every frame of a pose document
    Render(RenderArgs),
    /// Play a pose document at its frame rate
    Play(PlayArgs),
    /// Print a document summary and validation report
    Inspect(InspectArgs),
}

/// Output format for rendered frames.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// SVG markup
    #[default]
    Svg,
    /// Rasterized PNG image
    Png,
}

impl From<OutputFormat> for FrameFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Svg => Self::Svg,
            OutputFormat::Png => Self::Png,
        }
    }
}

/// Arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Pose document source (path, file:// or http(s):// URL, or "demo")
    #[arg(short, long)]
    pub source: Option<String>,

    /// Frame index to render (wraps around the frame count)
    #[arg(long, default_value_t = 0)]
    pub frame: usize,

    /// Render every frame
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Output file (single frame) or directory (--all) [default: runs/render/render*]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Joint circle radius
    #[arg(long, default_value_t = DEFAULT_JOINT_RADIUS)]
    pub radius: f32,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments for the play command.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Pose document source (path, file:// or http(s):// URL, or "demo")
    #[arg(short, long)]
    pub source: Option<String>,

    /// Override the document's frames per second
    #[arg(long)]
    pub fps: Option<f32>,

    /// Number of full loops to play (ignored with --show)
    #[arg(long, default_value_t = 1)]
    pub loops: usize,

    /// Save every displayed frame to runs/render/play*
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Display frames in a window until it is closed
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

/// Arguments for the inspect command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Pose document source (path, file:// or http(s):// URL, or "demo")
    #[arg(short, long)]
    pub source: Option<String>,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args_defaults() {
        let args = Cli::parse_from(["app", "render"]);
        match args.command {
            Commands::Render(render_args) => {
                assert!(render_args.source.is_none());
                assert_eq!(render_args.frame, 0);
                assert!(!render_args.all);
                assert_eq!(render_args.format, OutputFormat::Svg);
                assert!(render_args.output.is_none());
                assert!((render_args.radius - 4.0).abs() < f32::EPSILON);
                assert!(render_args.verbose);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_args_custom() {
        let args = Cli::parse_from([
            "app", "render", "-s", "walk.json", "--frame", "7", "--format", "png", "-o",
            "out.png", "--radius", "6", "--verbose", "false",
        ]);
        match args.command {
            Commands::Render(render_args) => {
                assert_eq!(render_args.source.as_deref(), Some("walk.json"));
                assert_eq!(render_args.frame, 7);
                assert_eq!(render_args.format, OutputFormat::Png);
                assert_eq!(render_args.output, Some(PathBuf::from("out.png")));
                assert!((render_args.radius - 6.0).abs() < f32::EPSILON);
                assert!(!render_args.verbose);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_play_args() {
        let args = Cli::parse_from(["app", "play", "--fps", "12.5", "--save"]);
        match args.command {
            Commands::Play(play_args) => {
                assert_eq!(play_args.fps, Some(12.5));
                assert_eq!(play_args.loops, 1);
                assert!(play_args.save);
                assert!(!play_args.show);
            }
            _ => panic!("expected play"),
        }
    }

    #[test]
    fn test_inspect_args() {
        let args = Cli::parse_from(["app", "inspect", "--source", "demo"]);
        assert!(matches!(
            args.command,
            Commands::Inspect(InspectArgs { source: Some(ref s), verbose: true }) if s == "demo"
        ));
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(FrameFormat::from(OutputFormat::Png), FrameFormat::Png);
        assert_eq!(FrameFormat::from(OutputFormat::default()), FrameFormat::Svg);
    }
}
