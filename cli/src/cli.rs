use clap::{ArgEnum, Args as ClapArgs, Parser, Subcommand};
use deep_cube::config::{EXPLORATION, MAX_STATES, TIME_LIMIT_SECS, VIRTUAL_LOSS, WORKERS};

/// Solve scrambled Rubik's cubes with oracle-guided search
#[derive(Parser)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
    /// Log every expansion round
    #[clap(short, long)]
    pub verbose: bool,
    /// Write the log to this file instead of stderr
    #[clap(long)]
    pub log_file: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Solve one scramble, given in move notation or generated at random
    Solve {
        /// Moves to scramble with, such as "F U' R"
        #[clap(long)]
        scramble: Option<String>,
        /// Number of random moves when no scramble is given
        #[clap(short, long, default_value_t = 10)]
        depth: usize,
        #[clap(flatten)]
        search: SearchArgs,
    },
    /// Report solve rates over many random scrambles
    Evaluate {
        /// Evaluate every scramble depth from 1 up to this
        #[clap(short, long, default_value_t = 5)]
        depth: usize,
        /// Scrambles per depth
        #[clap(short, long, default_value_t = 10)]
        games: usize,
        #[clap(flatten)]
        search: SearchArgs,
    },
}

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearcherKind {
    Mcts,
    Bfs,
    Astar,
    Policy,
    Random,
}

#[derive(ArgEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleKind {
    Uniform,
    Misplaced,
}

#[derive(ClapArgs)]
pub struct SearchArgs {
    #[clap(short, long, arg_enum, default_value_t = SearcherKind::Mcts)]
    pub searcher: SearcherKind,
    /// Built-in oracle, ignored when a model is given
    #[clap(long, arg_enum, default_value_t = OracleKind::Misplaced)]
    pub oracle: OracleKind,
    /// Path to model weights, needs the torch feature
    #[clap(short, long)]
    pub model: Option<String>,
    /// Disable GPU usage
    #[clap(long)]
    pub no_gpu: bool,
    /// Seconds per search
    #[clap(short, long, default_value_t = TIME_LIMIT_SECS)]
    pub time_limit: f64,
    /// Maximum number of states per search
    #[clap(long, default_value_t = MAX_STATES)]
    pub max_states: usize,
    /// Exploration constant of UCT
    #[clap(short, default_value_t = EXPLORATION)]
    pub c: f32,
    /// Virtual loss of UCT
    #[clap(long, default_value_t = VIRTUAL_LOSS)]
    pub nu: f32,
    /// Traversals per expansion
    #[clap(short, long, default_value_t = WORKERS)]
    pub workers: usize,
    /// Link new states to all of their known neighbours
    #[clap(long)]
    pub complete_graph: bool,
    /// Shorten solutions through the search graph
    #[clap(long)]
    pub shorten: bool,
    /// Follow the policy prior instead of UCT inside the tree
    #[clap(long)]
    pub greedy: bool,
    /// Sample from the policy instead of taking its argmax
    #[clap(long)]
    pub sample: bool,
    /// Seed for reproducible runs
    #[clap(long)]
    pub seed: Option<u64>,
}
