use std::fmt::{self, Display};

use balance_search::DecisionTree;

/// Indented text rendering of a decision tree, two spaces per level.
///
/// With `happy_path` only the first outcome of each weighing is followed.
pub fn render_tree(tree: &DecisionTree, happy_path: bool) -> String {
    TreeView { tree, happy_path }.to_string()
}

struct TreeView<'a> {
    tree: &'a DecisionTree,
    happy_path: bool,
}

impl Display for TreeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.tree, 0, self.happy_path)
    }
}

fn write_node(
    f: &mut fmt::Formatter<'_>,
    tree: &DecisionTree,
    level: usize,
    happy_path: bool,
) -> fmt::Result {
    let indent = "  ".repeat(level);
    let bounds = match tree.bounds.max {
        Some(max) if max == tree.bounds.min => format!("{max}"),
        Some(max) => format!("{}..={max}", tree.bounds.min),
        None => format!("{}..", tree.bounds.min),
    };
    writeln!(f, "{indent}[{bounds}] {}", tree.state)?;
    let Some(step) = &tree.step else {
        return writeln!(f, "{indent}  solved");
    };
    let mirror = if step.symmetric { " (symmetric)" } else { "" };
    writeln!(f, "{indent}  weigh {}{mirror}", step.pans)?;
    writeln!(f, "{indent}  -> {}", step.output)?;
    let branches = if happy_path {
        &step.branches[..step.branches.len().min(1)]
    } else {
        &step.branches[..]
    };
    for branch in branches {
        writeln!(f, "{indent}  {}:", branch.outcome)?;
        write_node(f, &branch.tree, level + 2, happy_path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use balance_core::Outcome;
    use balance_search::{Bounds, Branch, WeighingStep};

    fn leaf(state: &str) -> DecisionTree {
        DecisionTree {
            state: state.to_string(),
            bounds: Bounds { min: 0, max: Some(0) },
            solved: true,
            step: None,
        }
    }

    fn sample() -> DecisionTree {
        DecisionTree {
            state: "root".to_string(),
            bounds: Bounds { min: 1, max: Some(1) },
            solved: false,
            step: Some(WeighingStep {
                pans: "L[1] R[1]".to_string(),
                output: "Partition: { 3 parts;  Sizes: [1, 1, 1] }".to_string(),
                symmetric: true,
                branches: vec![
                    Branch {
                        outcome: Outcome::LeftHeavier,
                        tree: leaf("left"),
                    },
                    Branch {
                        outcome: Outcome::Balances,
                        tree: leaf("even"),
                    },
                ],
            }),
        }
    }

    #[test]
    fn full_tree_lists_every_branch() {
        let text = render_tree(&sample(), false);
        let expected = "\
[1] root
  weigh L[1] R[1] (symmetric)
  -> Partition: { 3 parts;  Sizes: [1, 1, 1] }
  Left:
    [0] left
      solved
  Balanced:
    [0] even
      solved
";
        assert_eq!(text, expected);
    }

    #[test]
    fn open_and_ranged_bounds() {
        let mut tree = leaf("open");
        tree.bounds = Bounds { min: 2, max: None };
        tree.solved = false;
        assert_eq!(render_tree(&tree, false), "[2..] open\n  solved\n");
        tree.bounds = Bounds { min: 1, max: Some(3) };
        assert!(render_tree(&tree, false).starts_with("[1..=3] open\n"));
    }

    #[test]
    fn happy_path_keeps_the_first_branch() {
        let text = render_tree(&sample(), true);
        assert!(text.contains("left"));
        assert!(!text.contains("even"));
    }
}
