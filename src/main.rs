use std::process;

use clap::Parser;

use paratidy::ExitStatus;
use paratidy::args::partition;
use paratidy::cli::Args;

fn main() {
    let mut argv = std::env::args_os();
    let program = argv.next().unwrap_or_else(|| "paratidy".into());
    // Split before clap sees anything so the `--` and the tool flags after it
    // reach the tool untouched.
    let segments = partition(argv);
    let args = Args::parse_from(std::iter::once(program).chain(segments.files));

    paratidy::logging::init(args.debug);

    match paratidy::run(&args, &segments.trailing_args) {
        Ok(status) => process::exit(status.code()),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(ExitStatus::Fatal.code());
        }
    }
}
