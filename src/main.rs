use clap::Parser;
use docmatch::{
    algorithm::{compare, segment::segment},
    config::{load_config_file, Config, ConfigOpt},
    input::provider_for,
    report,
    validate::{print_errors, validate},
    DynResult,
};
use std::fs::File;
use std::io::{stdout, BufWriter, Write as _};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Find passages that two documents have in common")]
#[command(arg_required_else_help(true))]
struct Args {
    /// First document: a PDF, a text file or `-` for standard input.
    first: String,
    /// Second document.
    second: String,
    /// Write the report to FILE instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Read settings from FILE instead of the default config location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    #[command(flatten)]
    config_opt: ConfigOpt,
}

fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();
}

fn display_name(name: &str) -> String {
    match Path::new(name).file_name() {
        Some(file_name) => file_name.to_string_lossy().into_owned(),
        None => name.to_owned(),
    }
}

fn try_main() -> DynResult<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = Config::default()
        .update(load_config_file(args.config.as_deref())?)
        .update(args.config_opt);
    let params = config.validate()?;
    log::debug!("{params:?}");

    if args.first == "-" && args.second == "-" {
        return Err("standard input can only be used for one of the documents")?;
    }
    let providers = [
        provider_for(&args.first, &config.extractor)?,
        provider_for(&args.second, &config.extractor)?,
    ];
    let lines = [providers[0].read_lines()?, providers[1].read_lines()?];
    let names = providers.map(|provider| display_name(&provider.name()));

    let comparison = compare([&lines[0][..], &lines[1][..]], &params);

    // Counted apart from compare() so that validate() checks the summary against an
    // independent segmentation instead of against itself.
    let sentence_counts = [0, 1].map(|side| segment(&lines[side][..], params.min_sentence_words).len());
    print_errors(&validate(&comparison, sentence_counts));

    let names = [names[0].as_str(), names[1].as_str()];
    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("cannot create {}: {e}", path.display()))?;
            let mut writer = BufWriter::new(file);
            report::print(&comparison, names, config.mode, config.color.enabled(false), &mut writer)?;
            writer.flush()?;
            log::info!("report written to {}", path.display());
            println!("{}", report::summary_line(&comparison.summary));
        }
        None => {
            let styled = config.color.enabled(atty::is(atty::Stream::Stdout));
            report::print(&comparison, names, config.mode, styled, &mut stdout().lock())?;
        }
    }

    Ok(())
}

fn main() {
    // Returning the error from main() would print it with Debug instead of Display.
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
