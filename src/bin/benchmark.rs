use std::{
    ffi::OsStr,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use clap::Parser;
use docmatch::{
    algorithm::{
        benchmark::{run_comparison, synthetic_pair, BenchmarkResult},
        ComparisonParams,
    },
    config::{Config, ConfigOpt},
};
use regex::Regex;

#[derive(Debug)]
struct Testcase {
    left: PathBuf,
    right: PathBuf,
}

#[derive(Parser)]
struct Args {
    /// Directory with `NAME.left` / `NAME.right` document pairs.
    testcase_directory: Option<String>,

    #[arg(short, long, default_value_t = String::from(""))]
    filter: String,

    /// Also run on this many generated document pairs.
    #[arg(long, default_value_t = 0)]
    synthetic: u64,

    #[arg(long, default_value_t = 2000)]
    synthetic_sentences: usize,

    #[arg(long, default_value_t = 50)]
    synthetic_planted: usize,

    #[command(flatten)]
    config_opt: ConfigOpt,
}

fn find_testcases(directory: &Path, regex: &Regex) -> Result<Vec<Testcase>, Box<dyn std::error::Error>> {
    let mut testcases = vec![];
    for file in std::fs::read_dir(directory)? {
        let path = file?.path();
        if path.extension() != Some(OsStr::new("left")) {
            continue;
        }

        if path
            .file_stem()
            .and_then(OsStr::to_str)
            .map(|s: &str| regex.is_match(s))
            != Some(true)
        {
            continue;
        }
        let left = path;
        let mut right = left.clone();
        right.set_extension("right");
        if !right.exists() {
            continue;
        }

        testcases.push(Testcase { left, right });
    }
    testcases.sort_by(|a, b| a.left.cmp(&b.left));
    Ok(testcases)
}

fn report(result: &BenchmarkResult) {
    println!(
        "{} matches, {}+{} sentences, {}+{} chunks, {:.3} s",
        result.summary.matches,
        result.summary.sentences[0],
        result.summary.sentences[1],
        result.summary.chunks[0],
        result.summary.chunks[1],
        result.elapsed.as_secs_f64()
    );
}

fn run_testcase(testcase: &Testcase, params: &ComparisonParams) -> Result<(), Box<dyn std::error::Error>> {
    println!("Compare {:?} vs {:?}", testcase.left, testcase.right);
    let left = read_to_string(&testcase.left)?;
    let right = read_to_string(&testcase.right)?;
    let lines = [left, right].map(|text| text.lines().map(str::to_owned).collect::<Vec<_>>());
    report(&run_comparison([&lines[0][..], &lines[1][..]], params));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let params = Config::default().update(args.config_opt).validate()?;

    if let Some(directory) = &args.testcase_directory {
        let regex = Regex::new(&args.filter)?;
        for testcase in find_testcases(Path::new(directory), &regex)? {
            run_testcase(&testcase, &params)?;
        }
    }

    for seed in 0..args.synthetic {
        let pair = synthetic_pair(seed, args.synthetic_sentences, args.synthetic_planted);
        println!("Synthetic pair #{seed} with {} planted passages", pair.planted);
        report(&run_comparison([&pair.documents[0][..], &pair.documents[1][..]], &params));
    }

    Ok(())
}
