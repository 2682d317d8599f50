use clap::Parser;
use console::style;
use phoneme_stats::{CmuDict, Corpus, CorpusOptions, ExportOutcome, LookupCache};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Phoneme frequency statistics for a directory of text passages.
#[derive(Parser, Debug)]
#[command()]
struct Args {
  /// Directory containing the .txt passages
  #[arg()]
  corpus: PathBuf,

  /// CMU pronouncing dictionary file
  #[arg(long, default_value = "res/cmudict.dict")]
  dictionary: PathBuf,

  /// Count stressed vowel variants (AH0, AH1, ...) separately
  #[arg(long)]
  keep_stress: bool,

  /// Do not write computed passages to the cache
  #[arg(long)]
  no_cache: bool,

  /// Ignore cached passages and recompute everything
  #[arg(long)]
  rebuild: bool,

  /// Analyze passages in parallel
  #[arg(long)]
  parallel: bool,

  /// Export OOV words, optionally to the given path
  #[arg(long, num_args = 0..=1)]
  export_oovs: Option<Option<PathBuf>>,

  /// Print per-passage phoneme tables as JSON
  #[arg(long)]
  json: bool,
}

#[derive(Serialize)]
struct PassageReport<'a> {
  name: Option<&'a str>,
  n_words: usize,
  n_phonemes: usize,
  n_unique_phonemes: usize,
  oovs: Vec<String>,
  phonemes: BTreeMap<String, (usize, [usize; 3])>,
}

fn run(args: Args) -> phoneme_stats::Result<()> {
  let dictionary = CmuDict::load(&args.dictionary)?;
  let cache = LookupCache::new(&dictionary);

  let options = CorpusOptions {
    ignore_stress: !args.keep_stress,
    use_cache: !args.no_cache,
    load_from_cache: !args.rebuild,
    parallel: args.parallel,
  };
  let corpus = Corpus::build(&args.corpus, options, &cache)?;

  if args.json {
    let reports: Vec<PassageReport> = corpus.passages().iter().map(|p| {
      let totals = p.phoneme_count();
      let by_position = p.positional_count();
      PassageReport {
        name: p.name(),
        n_words: p.n_words(),
        n_phonemes: p.n_phonemes(),
        n_unique_phonemes: p.n_unique_phonemes(),
        oovs: p.oovs(),
        phonemes: totals.into_iter().map(|(k, n)| {
          let slots = by_position.get(&k).copied().unwrap_or_default();
          (k, (n, slots))
        }).collect(),
      }
    }).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
  } else {
    for p in corpus.passages() {
      println!("{} {} words, {} phonemes ({} unique), {} OOV",
        style(p.name().unwrap_or("<unnamed>")).bold(),
        p.n_words(),
        p.n_phonemes(),
        p.n_unique_phonemes(),
        style(p.oovs().len()).yellow()
      );
    }
    println!("{} distinct OOV words across {} passages", corpus.oovs().len(), corpus.passages().len());
  }

  if let Some(outpath) = &args.export_oovs {
    match corpus.export_oovs(outpath.as_deref())? {
      ExportOutcome::Written { path, count } => println!("Wrote {} OOV words to {}", count, path.display()),
      ExportOutcome::NothingToExport => println!("No OOV words in the corpus."),
    }
  }

  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "phoneme_stats=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let args = Args::parse();

  match run(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{} {}", style("error:").red().bold(), e);
      ExitCode::FAILURE
    }
  }
}
