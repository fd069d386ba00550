//! Cycle localization for circular dependency errors.
//!
//! These only run on the error path, so they favor simplicity over speed.

use crate::resolver::{DependencyGraph, ManifestError};

/// Find a cycle among the units a sort failed to emit.
///
/// Every unit left in the remainder has at least one dependency that is
/// also in the remainder, so walking such dependencies from any remainder
/// unit must eventually revisit a unit.
pub fn cycle_in_remainder(graph: &DependencyGraph, emitted: &[bool]) -> ManifestError {
    let Some(start) = (0..graph.len()).find(|&i| !emitted[i]) else {
        return ManifestError::invariant("cycle requested but every unit was sorted");
    };

    let mut seen_at: Vec<Option<usize>> = vec![None; graph.len()];
    let mut trail: Vec<usize> = Vec::new();
    let mut current = start;

    loop {
        if let Some(pos) = seen_at[current] {
            return circular_dependency(graph, &trail[pos..]);
        }
        seen_at[current] = Some(trail.len());
        trail.push(current);

        match graph
            .dependencies(current)
            .into_iter()
            .find(|&dep| !emitted[dep])
        {
            Some(next) => current = next,
            None => {
                return ManifestError::invariant(format!(
                    "`{}` is unsorted but has no unsorted dependency",
                    graph.unit(current)
                ));
            }
        }
    }
}

/// Cut the cycle out of a depth-first trail that ran back into `reentered`.
pub fn cycle_from_trail(graph: &DependencyGraph, trail: &[usize], reentered: usize) -> ManifestError {
    match trail.iter().position(|&node| node == reentered) {
        Some(pos) => circular_dependency(graph, &trail[pos..]),
        None => ManifestError::invariant(format!(
            "`{}` is in progress but not on the trail",
            graph.unit(reentered)
        )),
    }
}

/// `cycle` lists unit indices in dependency direction: each unit requires
/// the next, and the last requires the first.
fn circular_dependency(graph: &DependencyGraph, cycle: &[usize]) -> ManifestError {
    let units: Vec<_> = cycle.iter().map(|&i| graph.unit(i).clone()).collect();
    let mut path: Vec<_> = units.iter().map(|u| u.representative_namespace()).collect();
    if let Some(&first) = path.first() {
        path.push(first);
    }

    tracing::debug!("found cycle through {} units", units.len());
    ManifestError::CircularDependency { cycle: path, units }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{render_cycle, MissingPolicy};
    use crate::test_support::{registry_of, unit};

    fn graph(units: Vec<crate::core::SourceUnit>) -> DependencyGraph {
        let registry = registry_of(&units);
        DependencyGraph::build(&units, &registry, MissingPolicy::Fail).unwrap()
    }

    fn path_of(err: &ManifestError) -> String {
        match err {
            ManifestError::CircularDependency { cycle, .. } => render_cycle(cycle),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_remainder_walk_skips_acyclic_prefix() {
        // lead -> x -> y -> z -> x
        let g = graph(vec![
            unit("lead.js", &["lead"], &["x"]),
            unit("x.js", &["x"], &["y"]),
            unit("y.js", &["y"], &["z"]),
            unit("z.js", &["z"], &["x"]),
        ]);

        let err = cycle_in_remainder(&g, &[false; 4]);
        assert_eq!(path_of(&err), "x -> y -> z -> x");
    }

    #[test]
    fn test_remainder_ignores_emitted_units() {
        let g = graph(vec![
            unit("base.js", &["goog"], &[]),
            unit("x.js", &["x"], &["goog", "y"]),
            unit("y.js", &["y"], &["goog", "x"]),
        ]);

        let err = cycle_in_remainder(&g, &[true, false, false]);
        assert_eq!(path_of(&err), "x -> y -> x");
    }

    #[test]
    fn test_trail_cycle() {
        let g = graph(vec![
            unit("a.js", &["a"], &["b"]),
            unit("b.js", &["b"], &["c"]),
            unit("c.js", &["c"], &["b"]),
        ]);

        let err = cycle_from_trail(&g, &[0, 1, 2], 1);
        assert_eq!(path_of(&err), "b -> c -> b");
        match err {
            ManifestError::CircularDependency { units, .. } => {
                let ids: Vec<_> = units.iter().map(|u| u.id()).collect();
                assert_eq!(ids, vec!["b.js", "c.js"]);
            }
            _ => unreachable!(),
        }
    }
}
