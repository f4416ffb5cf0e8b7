//! Play a series of games between two agents, and report the results.

use std::error::Error;
use std::io;

use board_game_traits::Color;
use clap::{Arg, ArgAction, Command};
use log::{debug, info, warn};

use tak_search::scoring::ScoringRules;
use tak_search::search::{
    Agent, MctsAgent, MctsSetting, MinMax, PolicyAgent, RandomPolicy, Sarsa, SarsaAgent,
};
use tak_search::{GameConfig, GameState, TakEnvironment};

const AGENT_KINDS: [&str; 4] = ["random", "minimax", "mcts", "sarsa"];

#[derive(Clone, Copy, Debug)]
struct AgentOptions {
    minmax_depth: u16,
    mcts_iterations: u32,
    mcts_rollouts: u32,
    place_probability: f64,
}

fn make_agent(
    kind: &str,
    side: Color,
    seed: u64,
    options: AgentOptions,
) -> Box<dyn Agent> {
    match kind {
        "minimax" => Box::new(PolicyAgent::new(MinMax::new(options.minmax_depth), seed)),
        "mcts" => Box::new(MctsAgent::new(
            side,
            MctsSetting::default()
                .iterations(options.mcts_iterations)
                .rollouts(options.mcts_rollouts)
                .place_probability(options.place_probability)
                .seed(seed),
        )),
        "sarsa" => Box::new(SarsaAgent::new(
            Sarsa::default().place_probability(options.place_probability),
            seed,
        )),
        _ => Box::new(PolicyAgent::new(
            RandomPolicy::weighted(options.place_probability),
            seed,
        )),
    }
}

/// Play one game to the end. Returns the final position.
fn play_game(
    env: &TakEnvironment,
    white: &mut dyn Agent,
    black: &mut dyn Agent,
    max_plies: usize,
) -> Result<Option<GameState>, Box<dyn Error>> {
    let mut state = env.reset();
    for ply in 0..max_plies {
        let action = match state.side_to_move() {
            Color::White => white.select_action(env, &state)?,
            Color::Black => black.select_action(env, &state)?,
        };
        let (next, result) = env.step(&state, &action)?;
        debug!("Ply {}: {} played {}", ply, state.side_to_move(), action);
        white.observe(env, &state, &action, &next);
        black.observe(env, &state, &action, &next);
        state = next;
        if result.done {
            return Ok(Some(state));
        }
    }
    Ok(None)
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("Tak agent match")
        .version("0.1")
        .arg(
            Arg::new("size")
                .short('s')
                .long("size")
                .env("SIZE")
                .help("Board size")
                .num_args(1)
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(3..=8)),
        )
        .arg(
            Arg::new("games")
                .short('n')
                .long("games")
                .help("Number of games to play")
                .num_args(1)
                .default_value("10")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("white")
                .long("white")
                .help("Agent playing white")
                .num_args(1)
                .default_value("mcts")
                .value_parser(AGENT_KINDS),
        )
        .arg(
            Arg::new("black")
                .long("black")
                .help("Agent playing black")
                .num_args(1)
                .default_value("random")
                .value_parser(AGENT_KINDS),
        )
        .arg(
            Arg::new("rules")
                .long("rules")
                .help("Scoring rules")
                .num_args(1)
                .default_value("default")
                .value_parser(["default", "downings", "middletown", "tarway"]),
        )
        .arg(
            Arg::new("noDiscount")
                .long("no-discount")
                .help("Score lost games as 0 rather than negative")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("minmaxDepth")
                .long("minmax-depth")
                .num_args(1)
                .default_value("2")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("mctsIterations")
                .long("mcts-iterations")
                .num_args(1)
                .default_value("10")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("mctsRollouts")
                .long("mcts-rollouts")
                .num_args(1)
                .default_value("10")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("placeProbability")
                .long("place-probability")
                .help("Share of placements among random actions")
                .num_args(1)
                .default_value("0.5")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("maxPlies")
                .long("max-plies")
                .help("Games longer than this are abandoned")
                .num_args(1)
                .default_value("1000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .env("SEED")
                .num_args(1)
                .default_value("0")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("logfile")
                .short('l')
                .long("logfile")
                .env("LOGFILE")
                .value_name("tak_match.log")
                .help("Name of debug logfile")
                .num_args(1),
        )
        .get_matches();

    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    if let Some(log_file) = matches.get_one::<String>("logfile") {
        log_dispatcher
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Debug)
                    .chain(fern::log_file(log_file)?),
            )
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Info)
                    .chain(io::stderr()),
            )
            .apply()?
    } else {
        log_dispatcher
            .level(log::LevelFilter::Info)
            .chain(io::stderr())
            .apply()?
    }

    let size = *matches.get_one::<u64>("size").unwrap() as usize;
    let games = *matches.get_one::<u32>("games").unwrap();
    let white_kind = matches.get_one::<String>("white").unwrap().clone();
    let black_kind = matches.get_one::<String>("black").unwrap().clone();
    let rules = ScoringRules::from_name(matches.get_one::<String>("rules").unwrap());
    let max_plies = *matches.get_one::<usize>("maxPlies").unwrap();
    let seed = *matches.get_one::<u64>("seed").unwrap();
    let options = AgentOptions {
        minmax_depth: *matches.get_one::<u16>("minmaxDepth").unwrap(),
        mcts_iterations: *matches.get_one::<u32>("mctsIterations").unwrap(),
        mcts_rollouts: *matches.get_one::<u32>("mctsRollouts").unwrap(),
        place_probability: *matches.get_one::<f64>("placeProbability").unwrap(),
    };

    let config = GameConfig::new(size)?
        .rules(rules)
        .discount(!matches.get_flag("noDiscount"));
    let env = TakEnvironment::new(config)?;

    info!(
        "Playing {} games on {}x{}, {} vs {}, {} rules",
        games, size, size, white_kind, black_kind, rules
    );

    let mut white = make_agent(&white_kind, Color::White, seed, options);
    let mut black = make_agent(&black_kind, Color::Black, seed.wrapping_add(1), options);

    let (mut white_wins, mut black_wins, mut draws, mut abandoned) = (0, 0, 0, 0);
    let mut white_score = 0.0;
    for game in 0..games {
        match play_game(&env, white.as_mut(), black.as_mut(), max_plies)? {
            Some(state) => {
                let outcome = state.outcome().copied();
                let winner = outcome.and_then(|outcome| outcome.winner);
                match winner {
                    Some(Color::White) => white_wins += 1,
                    Some(Color::Black) => black_wins += 1,
                    None => draws += 1,
                }
                let score = env.compute_score(&state, Color::White, winner);
                white_score += score;
                info!(
                    "Game {}: {:?} by {:?}, white scores {}",
                    game + 1,
                    winner,
                    outcome.map(|outcome| outcome.reason),
                    score
                );
            }
            None => {
                abandoned += 1;
                warn!("Game {} abandoned after {} plies", game + 1, max_plies);
            }
        }
    }

    println!(
        "{} vs {}: +{}-{}={}, {} abandoned, average white score {:.2}",
        white_kind,
        black_kind,
        white_wins,
        black_wins,
        draws,
        abandoned,
        white_score / games.max(1) as f32
    );
    Ok(())
}
