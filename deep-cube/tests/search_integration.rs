use std::time::Duration;

use cube::{parse_actions, scramble, Action, Cube};
use deep_cube::{
    search::{AStar, AStarConfig, Bfs, Mcts, MctsConfig, Outcome, PolicySearch, RandomWalk, Searcher, TreePolicy},
    MisplacedOracle,
    UniformOracle,
};
use rand::{rngs::StdRng, SeedableRng};

fn replay(mut cube: Cube, actions: &[Action]) -> Cube {
    cube.apply_all(actions.iter().copied());
    cube
}

fn check_solution(searcher: &mut dyn Searcher, root: Cube) {
    let solved = searcher.search(root, Duration::from_secs(30), 1_000_000).unwrap();
    assert!(solved, "{searcher} did not solve {root}");
    assert_eq!(searcher.outcome(), Outcome::Solved);
    assert!(replay(root, searcher.action_queue()).is_solved(), "{searcher}");
    assert!(searcher.explored_states() >= 1);
}

#[test]
fn two_move_scramble_with_uct() {
    let mut root = Cube::solved();
    root.apply_all([Action::from_index(3), Action::from_index(7)]);
    let oracle = UniformOracle;
    let mut mcts = Mcts::new(&oracle, MctsConfig {
        policy: TreePolicy::Uct { c: 1., nu: 0. },
        workers: 1,
        ..Default::default()
    });
    assert!(mcts.search(root, Duration::from_secs(1), 10_000).unwrap());
    assert!(replay(root, mcts.action_queue()).is_solved());
    assert!(mcts.explored_states() <= 10_000);
}

#[test]
fn every_searcher_solves_one_move() {
    let oracle = MisplacedOracle;
    let root = Cube::solved().applied("R".parse().unwrap());
    let mut searchers: Vec<Box<dyn Searcher + '_>> = vec![
        Box::new(Mcts::new(&oracle, MctsConfig::default())),
        Box::new(Bfs::new()),
        Box::new(AStar::new(&oracle, AStarConfig::default())),
    ];
    for searcher in &mut searchers {
        check_solution(searcher.as_mut(), root);
        assert_eq!(searcher.action_queue(), &["R'".parse::<Action>().unwrap()]);
    }
}

#[test]
fn bfs_is_optimal_on_parsed_scramble() {
    let actions = parse_actions("F U' R R").unwrap();
    let root = replay(Cube::solved(), &actions);
    let mut bfs = Bfs::new();
    check_solution(&mut bfs, root);
    assert_eq!(bfs.action_queue().len(), 4);
}

#[test]
fn bfs_within_scramble_depth() {
    let mut rng = StdRng::seed_from_u64(21);
    for depth in 1..=3 {
        let (root, _) = scramble(depth, &mut rng);
        let mut bfs = Bfs::new();
        check_solution(&mut bfs, root);
        assert!(bfs.action_queue().len() <= depth);
    }
}

#[test]
fn tree_policies_solve_shallow_scrambles() {
    let oracle = MisplacedOracle;
    let mut rng = StdRng::seed_from_u64(22);
    for policy in [
        TreePolicy::Uct { c: 0.5, nu: 0.2 },
        TreePolicy::Greedy { sample: true },
        TreePolicy::Random,
    ] {
        let (root, _) = scramble(3, &mut rng);
        let mut mcts = Mcts::new(&oracle, MctsConfig {
            policy,
            workers: 4,
            seed: Some(9),
            ..Default::default()
        });
        check_solution(&mut mcts, root);
    }
}

#[test]
fn budgets_end_the_search() {
    let (root, _) = scramble(25, &mut StdRng::seed_from_u64(23));
    let oracle = UniformOracle;

    let mut mcts = Mcts::new(&oracle, MctsConfig::default());
    assert!(!mcts.search(root, Duration::from_millis(50), usize::MAX).unwrap());
    assert_eq!(mcts.outcome(), Outcome::Timeout);
    assert!(mcts.action_queue().is_empty());

    let mut a_star = AStar::new(&oracle, AStarConfig::default());
    assert!(!a_star.search(root, Duration::from_secs(30), 500).unwrap());
    assert_eq!(a_star.outcome(), Outcome::SizeLimit);

    let mut walk = RandomWalk::default();
    assert!(!walk.search(root, Duration::from_secs(30), 100).unwrap());
    assert_eq!(walk.outcome(), Outcome::SizeLimit);
}

#[test]
fn searchers_describe_themselves() {
    let oracle = UniformOracle;
    let mcts = Mcts::new(&oracle, MctsConfig::default());
    assert!(mcts.to_string().starts_with("Monte Carlo tree search (UCT (c=1, nu=0)"));
    assert_eq!(Bfs::new().to_string(), "Breadth-first search");
    assert_eq!(RandomWalk::default().to_string(), "Random walk");
    assert_eq!(
        PolicySearch::new(&oracle, false, None).to_string(),
        "Policy search without sampling"
    );
}
