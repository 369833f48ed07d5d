//! Applying a grouping to a rendered document.

use log::debug;

use crate::cluster::{Clusterer, Group};
use crate::error::GroupResult;

/// The document side of the collapse pass.
///
/// A renderer owns whatever holds the listed signatures (a page, a text
/// buffer) and knows how to hide entries and add a control that reveals them
/// again.
pub trait Renderer {
    /// Handle for one listed signature.
    type Node: Clone;

    /// Every candidate declaration in document order, with its signature text.
    fn candidates(&mut self) -> Vec<(Self::Node, String)>;

    fn hide(&mut self, node: &Self::Node);

    /// Add a toggle right after `after` that reveals `hidden`.
    fn insert_toggle(&mut self, after: &Self::Node, hidden: &[Self::Node]);
}

/// Groups the renderer's candidates and folds every multi-member group
/// behind its representative. Singleton groups are left alone.
pub fn collapse<R: Renderer>(renderer: &mut R) -> GroupResult<Vec<Group>> {
    let candidates = renderer.candidates();
    let mut nodes = Vec::with_capacity(candidates.len());
    let mut clusterer = Clusterer::new();
    for (node, text) in candidates {
        nodes.push(node);
        clusterer.push(text)?;
    }
    let groups = clusterer.into_groups();

    for group in groups.iter().filter(|group| !group.is_singleton()) {
        let Some(representative) = group.representative() else {
            continue;
        };
        let hidden: Vec<R::Node> = group
            .hidden()
            .map(|member| nodes[member.index].clone())
            .collect();
        for node in &hidden {
            renderer.hide(node);
        }
        debug!(
            "folding {} signatures behind {:?}",
            hidden.len(),
            representative.text
        );
        renderer.insert_toggle(&nodes[representative.index], &hidden);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ListRenderer {
        lines: Vec<&'static str>,
        hidden: Vec<usize>,
        toggles: Vec<(usize, Vec<usize>)>,
    }

    impl Renderer for ListRenderer {
        type Node = usize;

        fn candidates(&mut self) -> Vec<(usize, String)> {
            self.lines
                .iter()
                .enumerate()
                .map(|(at, line)| (at, line.to_string()))
                .collect()
        }

        fn hide(&mut self, node: &usize) {
            self.hidden.push(*node);
        }

        fn insert_toggle(&mut self, after: &usize, hidden: &[usize]) {
            self.toggles.push((*after, hidden.to_vec()));
        }
    }

    #[test]
    fn test_collapse_hides_all_but_representative() {
        let mut renderer = ListRenderer {
            lines: vec![
                "impl<A> Debug for (A,)",
                "impl Debug for String",
                "impl<A, B> Debug for (A, B)",
                "impl<const N: usize> Debug for [u8; N]",
                "impl<A, B, C> Debug for (A, B, C)",
            ],
            ..Default::default()
        };
        let groups = collapse(&mut renderer).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(renderer.hidden, [0, 2]);
        assert_eq!(renderer.toggles, [(4, vec![0, 2])]);
    }

    #[test]
    fn test_collapse_leaves_singletons_alone() {
        let mut renderer = ListRenderer {
            lines: vec!["impl Debug for String", "impl Display for String"],
            ..Default::default()
        };
        collapse(&mut renderer).unwrap();
        assert!(renderer.hidden.is_empty());
        assert!(renderer.toggles.is_empty());
    }
}
