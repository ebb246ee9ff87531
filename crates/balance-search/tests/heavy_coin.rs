use balance_core::{Outcome, StateId};
use balance_search::{Bounds, DecisionTree, SearchEngine};

mod support;

use support::HeavyCoin;

fn solve(coins: u8) -> (SearchEngine<HeavyCoin>, Vec<usize>) {
    let mut engine = SearchEngine::new(HeavyCoin { coins });
    let sizes = engine.solve_breadth(coins);
    (engine, sizes)
}

fn assert_leaves_solved(tree: &DecisionTree) {
    match &tree.step {
        None => assert!(tree.solved),
        Some(step) => {
            assert!(!step.branches.is_empty());
            for branch in &step.branches {
                assert_leaves_solved(&branch.tree);
            }
        }
    }
}

#[test]
fn optimal_depths_match_log_three() {
    for (coins, depth) in [(3u8, 1u8), (4, 2), (9, 2), (10, 3)] {
        let (engine, sizes) = solve(coins);
        let bounds = engine.bounds(engine.root());
        assert_eq!(bounds, Bounds { min: depth, max: Some(depth) }, "coins {coins}");
        assert!(!sizes.is_empty());
        assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(*sizes.last().unwrap_or(&0), engine.len());
    }
}

#[test]
fn decision_tree_witnesses_the_bound() {
    let (engine, _) = solve(9);
    let tree = engine.decision_tree().expect("root is resolved");
    assert_eq!(tree.height(), 2);
    assert_leaves_solved(&tree);
    let step = tree.step.as_ref().expect("root needs a weighing");
    assert!(step.symmetric);
    let outcomes: Vec<_> = step.branches.iter().map(|branch| branch.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::LeftHeavier, Outcome::Balances]);
    assert_eq!(step.pans, "L[3] R[3]");
}

#[test]
fn stopping_early_keeps_valid_bounds() {
    let mut engine = SearchEngine::new(HeavyCoin { coins: 10 });
    let sizes = engine.solve_breadth(1);
    let bounds = engine.bounds(engine.root());
    assert!(!bounds.is_resolved());
    assert!(bounds.min >= 2 && bounds.min <= 3);
    assert!(bounds.max.map_or(true, |max| max >= 3));
    assert!(!sizes.is_empty());

    let more = engine.solve_breadth(10);
    assert!(engine.bounds(engine.root()).is_resolved());
    assert_eq!(engine.bounds(engine.root()).min, 3);
    assert!(more.first().copied().unwrap_or(0) >= *sizes.last().unwrap_or(&0));
}

#[test]
fn cursor_walks_the_expanded_graph() {
    let (engine, _) = solve(4);
    let mut cursor = engine.cursor();
    assert_eq!(cursor.state(), engine.root());
    assert!(cursor.weighing().is_none());
    assert!(!cursor.next_sibling());
    assert!(!cursor.parent());

    assert!(cursor.first_child());
    assert_eq!(cursor.depth(), 1);
    let first = cursor.state();
    assert_ne!(first, engine.root());
    assert!(cursor.weighing().is_some());
    assert!(cursor.outcome().is_some());

    let mut visited: Vec<StateId> = vec![first];
    while cursor.next_sibling() {
        visited.push(cursor.state());
        assert_eq!(cursor.depth(), 1);
    }
    let expected: usize = engine
        .children(engine.root())
        .iter()
        .map(|child| child.states().count())
        .sum();
    assert_eq!(visited.len(), expected);

    assert!(cursor.parent());
    assert_eq!(cursor.state(), engine.root());
    assert_eq!(cursor.bounds(), engine.bounds(engine.root()));
}

#[test]
fn expansion_prunes_uninformative_weighings() {
    let (engine, _) = solve(9);
    for child in engine.children(engine.root()) {
        assert!(child.states().count() >= 1);
        if child.symmetric {
            assert!(child.outcomes[Outcome::RightHeavier.index()].is_none());
        }
    }
    let first = engine
        .weighing_for_child(engine.root(), 0)
        .expect("root has children");
    assert_eq!(first, engine.children(engine.root())[0].weighing);
    let err = engine
        .weighing_for_child(engine.root(), 99)
        .expect_err("no such child");
    assert_eq!(err.code(), "unknown-child");
    let stats = engine.stats();
    assert!(stats.weighings_admitted <= stats.weighings_considered);
    assert!(stats.expanded >= 1);
}

#[test]
fn report_serialises_the_run() {
    let (engine, sizes) = solve(3);
    let report = engine.report(sizes.clone(), true);
    assert!(report.resolved);
    assert_eq!(report.depth_min, 1);
    assert_eq!(report.depth_max, Some(1));
    assert_eq!(report.graph_sizes, sizes);
    assert_eq!(report.problem, "find the heavy coin among 3");
    let json = report.to_json().expect("serialise");
    assert!(json.contains("\"resolved\": true"));
    assert_eq!(report.tree.as_ref().map(DecisionTree::leaves), Some(2));
}
