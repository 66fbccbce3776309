//! Query-spelling evaluation CLI.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use qspell::{
    eval, ApiConfig, BaselineSpeller, DictionarySpeller, Error, Evaluator, MultiValueStore,
    RemoteSpellCheck, RemoteSpeller, Result, SingleValueStore, Speller, WebLanguageModel,
    WebisCorpus, WordListDictionary,
};

#[derive(Parser)]
#[command(name = "qspell")]
#[command(
    author,
    version,
    about = "Query spelling correction research harness",
    long_about = r#"
qspell - evaluate query-spelling-correction algorithms on annotated corpora

CORPORA:
  A corpus file holds semicolon-delimited rows of `query;[variant]*`;
  a parallel annotation file tags each query with the spelling-error
  kinds it exhibits (space, character, insertion, deletion,
  substitution, transposition).

SPELLERS:
  baseline     - returns the query unchanged (the floor to beat)
  dictionary   - word-list candidates scored by a language model
  remote       - batched suggestions from a remote spell-check API

METRICS:
  EF1 (expected precision/recall/F1) and Precision@1, reported for the
  whole corpus and per error-kind slice.

EXAMPLES:
  qspell analyze --corpus corpus.csv --annotations annotations.csv
  qspell evaluate --corpus corpus.csv --annotations annotations.csv --speller baseline
  qspell spell --speller dictionary --dictionary words.txt --config api.toml "exam1ple"
"#
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a speller against an annotated corpus
    #[command(visible_alias = "e")]
    Evaluate(EvaluateArgs),

    /// Print statistics about an annotated corpus
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),

    /// Correct a single query and print its ranked candidates
    #[command(visible_alias = "s")]
    Spell(SpellArgs),
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus file (semicolon-delimited `query;variant;...` rows)
    #[arg(long)]
    corpus: PathBuf,

    /// Error-annotation file for the corpus
    #[arg(long)]
    annotations: PathBuf,

    /// Corpus identifier used in reports and artifact names
    #[arg(long)]
    tag: Option<String>,
}

impl CorpusArgs {
    fn corpus(&self) -> WebisCorpus {
        let corpus = WebisCorpus::new(&self.corpus, &self.annotations);
        match &self.tag {
            Some(tag) => corpus.with_tag(tag),
            None => corpus,
        }
    }
}

#[derive(Args)]
struct SpellerArgs {
    /// Spelling algorithm to use
    #[arg(long, value_enum, default_value = "baseline")]
    speller: SpellerKind,

    /// Word-list file for the dictionary speller
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// API configuration (TOML) for the remote oracles
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the oracle memoization stores
    #[arg(long, default_value = "data/log")]
    cache_dir: PathBuf,
}

#[derive(Args)]
struct EvaluateArgs {
    #[command(flatten)]
    corpus: CorpusArgs,

    #[command(flatten)]
    speller: SpellerArgs,

    /// Output directory for evaluation artifacts
    #[arg(long, default_value = "data/output")]
    out: PathBuf,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    corpus: CorpusArgs,
}

#[derive(Args)]
struct SpellArgs {
    #[command(flatten)]
    speller: SpellerArgs,

    /// Query to correct
    query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SpellerKind {
    /// Return the query unchanged with confidence 1.0
    Baseline,
    /// Dictionary candidates scored by a language model
    Dictionary,
    /// Batched suggestions from a remote spell-check API
    Remote,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate(args) => {
            let corpus = args.corpus.corpus();
            let mut speller = build_speller(&args.speller)?;

            let report = Evaluator::new(&args.out).evaluate(speller.as_mut(), &corpus)?;
            println!("{report}");
        }
        Commands::Analyze(args) => {
            let corpus = args.corpus.corpus();
            let stats = eval::analyze(&corpus, corpus.annotation_path())?;
            println!("{stats}");
        }
        Commands::Spell(args) => {
            let mut speller = build_speller(&args.speller)?;
            let ranked = speller.spell(&args.query)?;

            println!("Possible spellings of {:?}:", args.query);
            println!("-----------------------------------");
            for (candidate, confidence) in ranked {
                println!("{candidate} | {:.2}%", confidence * 100.0);
            }

            speller.flush()?;
        }
    }

    Ok(())
}

fn build_speller(args: &SpellerArgs) -> Result<Box<dyn Speller>> {
    match args.speller {
        SpellerKind::Baseline => Ok(Box::new(BaselineSpeller::new())),

        SpellerKind::Dictionary => {
            let dictionary_path = args.dictionary.as_ref().ok_or_else(|| {
                Error::config("the dictionary speller requires --dictionary <word list>")
            })?;
            let config = load_api_config(args)?;

            let dictionary = WordListDictionary::load(dictionary_path)?;
            let language_model = WebLanguageModel::new(
                config,
                SingleValueStore::open(args.cache_dir.join("joint-probability.json"))?,
                MultiValueStore::open(args.cache_dir.join("word-break-candidates.json"))?,
            );

            Ok(Box::new(DictionarySpeller::new(dictionary, language_model)))
        }

        SpellerKind::Remote => {
            let config = load_api_config(args)?;
            let client = RemoteSpellCheck::new(
                config,
                MultiValueStore::open(args.cache_dir.join("spell-candidates.json"))?,
            );

            Ok(Box::new(RemoteSpeller::new(client)))
        }
    }
}

fn load_api_config(args: &SpellerArgs) -> Result<ApiConfig> {
    let path = args.config.as_ref().ok_or_else(|| {
        Error::config("remote oracles require --config <api.toml> with a subscription key")
    })?;
    ApiConfig::load(path)
}
