// Pose Viewer 🚀 AGPL-3.0 License - https://www.gnu.org/licenses/agpl-3.0.html

use clap::Parser;

use pose_viewer::cli::args::{Cli, Commands};
use pose_viewer::cli::inspect::run_inspect;
use pose_viewer::cli::logging::set_verbose;
use pose_viewer::cli::play::run_play;
use pose_viewer::cli::render::run_render;

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Render(args) => {
            set_verbose(args.verbose);
            run_render(args);
        }
        Commands::Play(args) => {
            set_verbose(args.verbose);
            run_play(args);
        }
        Commands::Inspect(args) => {
            set_verbose(args.verbose);
            run_inspect(args);
        }
    }
}
