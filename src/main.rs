use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use chainbreaker::clock::SystemClock;
use chainbreaker::destroyable::Destroyable;
use chainbreaker::error::ErrorNotice;
use chainbreaker::game::{GameSession, Settings};
use chainbreaker::helpers::format_time;
use chainbreaker::model::{
    format_digits, Difficulty, GameEngineCommand, GameEngineEvent, GameOutcome, GameState,
    LossReason, CODE_LENGTH,
};
use chainbreaker::storage::FileStore;
use clap::Parser;

/// Crack the 4-digit code before your attempts or your time run out.
#[derive(Parser, Debug)]
#[command(name = "chainbreaker", version)]
struct Args {
    /// easy, normal, hard or expert
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Where the game in progress is saved
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seed for reproducible secret codes (also read from SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Ignore and discard any saved game
    #[arg(long)]
    fresh: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Digits(Vec<u8>),
    Delete,
    Submit,
    NewGame(Option<Difficulty>),
    Reset,
    Help,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let mut words = line.split_whitespace();
    match words.next() {
        None | Some("s") | Some("submit") => Input::Submit,
        Some("d") | Some("del") | Some("delete") => Input::Delete,
        Some("reset") => Input::Reset,
        Some("h") | Some("help") | Some("?") => Input::Help,
        Some("q") | Some("quit") | Some("exit") => Input::Quit,
        Some("new") => match words.next() {
            None => Input::NewGame(None),
            Some(name) => match name.parse() {
                Ok(difficulty) => Input::NewGame(Some(difficulty)),
                Err(err) => Input::Unknown(format!("{}", err)),
            },
        },
        Some(word) if word.chars().all(|c| c.is_ascii_digit()) => {
            Input::Digits(word.bytes().map(|b| b - b'0').collect())
        }
        Some(word) => Input::Unknown(format!("unknown command {:?}", word)),
    }
}

fn init_logging() {
    env_logger::init();
}

fn print_help() {
    println!("Enter digits (e.g. 1234), then press enter to submit.");
    println!("  d       delete the last digit");
    println!("  new [difficulty]  start over (easy, normal, hard, expert)");
    println!("  reset   abandon the game");
    println!("  q       quit (your game is saved)");
}

fn print_status(state: &GameState) {
    let Some(difficulty) = state.difficulty else {
        println!("No game running. Type `new` to start one.");
        return;
    };
    if state.is_game_over {
        println!("Game over. Type `new` to play again.");
        return;
    }
    let entered = format_digits(&state.current_guess);
    let blanks = "_".repeat(CODE_LENGTH - state.current_guess.len());
    println!(
        "[{}] attempts {}/{} | time left {} | guess {}{}",
        difficulty.display_name(),
        state.attempts_used(),
        state.max_attempts,
        format_time(state.remaining_time()),
        entered,
        blanks
    );
}

fn print_event(event: &GameEngineEvent) {
    match event {
        GameEngineEvent::GuessScored(guess) => println!("  {}", guess),
        GameEngineEvent::GameOver(GameOutcome::Won {
            attempts,
            elapsed_secs,
            ..
        }) => println!(
            "You cracked the code in {} tries ({})!",
            attempts,
            format_time(*elapsed_secs)
        ),
        GameEngineEvent::GameOver(GameOutcome::Lost { reason, .. }) => match reason {
            LossReason::AttemptsExhausted => println!("Out of attempts. The chain holds."),
            LossReason::TimeUp => println!("Time is up. The chain holds."),
        },
        GameEngineEvent::GameRestored(_) => println!("Restored your game in progress."),
        _ => (),
    }
}

fn run(args: Args) -> io::Result<()> {
    let settings = Settings::load();
    let store = Rc::new(FileStore::new(
        args.data_dir.unwrap_or_else(FileStore::default_dir),
    ));
    let seed = args.seed.or_else(Settings::seed_from_env);
    let mut session = GameSession::new(&settings, store, Rc::new(SystemClock), seed);
    let _printer = session.observer().subscribe(print_event);

    if args.fresh {
        session.clear_saved_game();
    }
    if args.fresh || !session.restore() {
        session.dispatch(GameEngineCommand::NewGame(
            args.difficulty.unwrap_or(settings.difficulty),
        ));
    }
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        session.poll();
        print_status(&session.state());
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        // the clock kept running while we waited for input
        session.poll();

        match parse_input(&line) {
            Input::Digits(digits) => {
                for digit in digits {
                    session.dispatch(GameEngineCommand::AddNumber(digit));
                }
            }
            Input::Delete => session.dispatch(GameEngineCommand::RemoveLastNumber),
            Input::Submit => {
                let state = session.state();
                if state.is_game_active() && !state.can_submit_guess() {
                    println!("Enter {} digits first.", CODE_LENGTH);
                } else {
                    session.submit_guess();
                }
            }
            Input::NewGame(difficulty) => {
                let difficulty = difficulty
                    .or(session.state().difficulty)
                    .unwrap_or(settings.difficulty);
                session.dispatch(GameEngineCommand::NewGame(difficulty));
            }
            Input::Reset => session.dispatch(GameEngineCommand::ResetGame),
            Input::Help => print_help(),
            Input::Quit => break,
            Input::Unknown(message) => println!("{}", message),
        }
    }

    session.flush();
    session.destroy();
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("{}", ErrorNotice::from_error(&err, Settings::is_debug_mode()));
        std::process::exit(1);
    }
}
