use std::{error::Error, process, time::Duration};

use clap::Parser;
use cli::{Args, Command, OracleKind, SearchArgs, SearcherKind};
use cube::{parse_actions, scramble, Cube};
use deep_cube::{
    search::{AStar, AStarConfig, Bfs, Mcts, MctsConfig, PolicySearch, RandomWalk, Searcher, TreePolicy},
    Evaluator,
    MisplacedOracle,
    Oracle,
    UniformOracle,
};
use log::{info, LevelFilter};
use mimalloc::MiMalloc;
use rand::{rngs::StdRng, SeedableRng};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod cli;

fn main() {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match &args.log_file {
        Some(path) => {
            if let Err(e) = simple_logging::log_to_file(path, level) {
                eprintln!("Could not open log file {path}: {e}");
                process::exit(1);
            }
        }
        None => simple_logging::log_to_stderr(level),
    }

    if let Err(e) = run(args.command) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Solve {
            scramble: moves,
            depth,
            search,
        } => {
            let root = match moves {
                Some(moves) => {
                    let mut root = Cube::solved();
                    root.apply_all(parse_actions(&moves)?);
                    root
                }
                None => {
                    let mut rng = rng(search.seed);
                    let (root, actions) = scramble(depth, &mut rng);
                    println!("scramble: {}", join(&actions));
                    root
                }
            };
            let oracle = oracle(&search)?;
            let mut searcher = searcher(&search, oracle.as_ref());
            let time_limit = Duration::from_secs_f64(search.time_limit);
            println!("{root}");

            if searcher.search(root, time_limit, search.max_states)? {
                println!("solution: {}", join(searcher.action_queue()));
                println!("{} actions", searcher.action_queue().len());
            } else {
                println!("no solution found ({:?})", searcher.outcome());
            }
            println!("explored {} states", searcher.explored_states());
        }
        Command::Evaluate { depth, games, search } => {
            let oracle = oracle(&search)?;
            let mut searcher = searcher(&search, oracle.as_ref());
            let evaluator = Evaluator {
                depths: (1..=depth).collect(),
                games,
                time_limit: Duration::from_secs_f64(search.time_limit),
                max_states: search.max_states,
                seed: search.seed,
            };
            for report in evaluator.evaluate(searcher.as_mut())? {
                println!("{report}");
            }
        }
    }
    Ok(())
}

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn join<T: ToString>(actions: &[T]) -> String {
    actions.iter().map(T::to_string).collect::<Vec<_>>().join(" ")
}

#[cfg(feature = "torch")]
fn model(search: &SearchArgs, path: &str) -> Result<Box<dyn Oracle>, Box<dyn Error>> {
    if !(search.no_gpu || deep_cube::use_cuda()) {
        return Err("could not enable CUDA".into());
    }
    let net = deep_cube::Net::load(path)?;
    info!("loaded model from {path}");
    Ok(Box::new(net))
}

#[cfg(not(feature = "torch"))]
fn model(_search: &SearchArgs, path: &str) -> Result<Box<dyn Oracle>, Box<dyn Error>> {
    Err(format!("cannot load {path}: built without the torch feature").into())
}

fn oracle(search: &SearchArgs) -> Result<Box<dyn Oracle>, Box<dyn Error>> {
    if let Some(path) = &search.model {
        return model(search, path);
    }
    info!("using the {:?} oracle", search.oracle);
    Ok(match search.oracle {
        OracleKind::Uniform => Box::new(UniformOracle),
        OracleKind::Misplaced => Box::new(MisplacedOracle),
    })
}

fn searcher<'a>(search: &SearchArgs, oracle: &'a dyn Oracle) -> Box<dyn Searcher + 'a> {
    match search.searcher {
        SearcherKind::Mcts => {
            let policy = if search.greedy {
                TreePolicy::Greedy { sample: search.sample }
            } else {
                TreePolicy::Uct {
                    c: search.c,
                    nu: search.nu,
                }
            };
            Box::new(Mcts::new(oracle, MctsConfig {
                policy,
                workers: search.workers,
                complete_graph: search.complete_graph,
                shorten: search.shorten,
                seed: search.seed,
                ..Default::default()
            }))
        }
        SearcherKind::Bfs => Box::new(Bfs::new()),
        SearcherKind::Astar => Box::new(AStar::new(oracle, AStarConfig {
            batch_size: search.workers,
            ..Default::default()
        })),
        SearcherKind::Policy => Box::new(PolicySearch::new(oracle, search.sample, search.seed)),
        SearcherKind::Random => Box::new(RandomWalk::new(search.seed)),
    }
}
