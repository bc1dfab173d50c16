use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use show_do_milhao::{
    CommandGenerator, FileStore, GeneratedSource, Leaderboard, QuestionSource, Session, Show,
    ShowError, StaticSource, builtin_questions, load_questions_from_json,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with an alternative question bank
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Directory where the leaderboard is kept
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Seed for question and lifeline randomness
    #[arg(short, long)]
    seed: Option<u64>,

    /// Command that generates questions (reads the prompt on stdin, answers on stdout)
    #[arg(short, long, conflicts_with = "questions")]
    generator: Option<String>,

    /// Seconds to wait for the generator before counting the attempt as failed
    #[arg(long, default_value_t = 30)]
    generator_timeout_secs: u64,

    /// Where log output goes
    #[arg(long, default_value = "show-do-milhao.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Cannot open log file {}: {}", args.log_file.display(), e);
    }

    if let Err(e) = run(args).await {
        log::error!("{}", e);
        eprintln!("Error running game: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

fn question_source(args: &Args) -> Result<Arc<dyn QuestionSource>, ShowError> {
    let source_rng = rng(args.seed, 0);

    if let Some(command_line) = &args.generator {
        let timeout = Duration::from_secs(args.generator_timeout_secs);
        if let Some(generator) = CommandGenerator::from_command_line(command_line, timeout) {
            log::info!("generating questions with `{}`", command_line);
            return Ok(Arc::new(GeneratedSource::new(generator, source_rng)));
        }
        log::warn!("empty generator command, using the question bank");
    }

    let questions = match &args.questions {
        Some(path) => load_questions_from_json(path)?,
        None => builtin_questions()?,
    };
    Ok(Arc::new(StaticSource::new(questions, source_rng)))
}

async fn run(args: Args) -> Result<(), ShowError> {
    let source = question_source(&args)?;
    let leaderboard = Leaderboard::load(Box::new(FileStore::new(&args.data_dir)));
    let session = Session::new(leaderboard, rng(args.seed, 1));

    Show::new(session, source).run().await
}
