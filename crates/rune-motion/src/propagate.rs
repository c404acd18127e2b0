//! Variant propagation over a subtree.
//!
//! Starting from the root, marked descendants are discovered in document
//! preorder up to a fixed number of levels. Each marked node's variant is
//! resolved, reduced to geometry and compensated against the root's declared
//! target. Unmarked nodes are skipped but do not stop the walk below them.
//!
//! ```text
//! root            (level 0, animated by the caller)
//! ├── child       (level 1)
//! │   └── leaf    (level 2)
//! │       └── ..  (level 3, not visited at the default depth)
//! └── child       (level 1)
//! ```

use tracing::trace;

use crate::compensate::compensate;
use crate::error::{MotionError, Result};
use crate::state::PartialState;
use crate::transition::{TransitionConfig, TransitionSpec};
use crate::tree::MotionNode;
use crate::variant::{resolve, VariantTable};

/// How many levels below the root are searched for markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropagationDepth(usize);

impl PropagationDepth {
    /// Direct children and their direct children. Kept as the default for
    /// compatibility with existing variant trees.
    pub const COMPAT: Self = Self(2);

    /// Every level of the subtree.
    pub const UNBOUNDED: Self = Self(usize::MAX);

    /// Fails with `InvalidPropagationDepth` for zero.
    pub fn new(levels: usize) -> Result<Self> {
        if levels == 0 {
            Err(MotionError::InvalidPropagationDepth)
        } else {
            Ok(Self(levels))
        }
    }

    pub fn levels(&self) -> usize {
        self.0
    }

    pub fn is_unbounded(&self) -> bool {
        self.0 == usize::MAX
    }
}

impl Default for PropagationDepth {
    fn default() -> Self {
        Self::COMPAT
    }
}

impl TryFrom<usize> for PropagationDepth {
    type Error = MotionError;

    fn try_from(levels: usize) -> Result<Self> {
        Self::new(levels)
    }
}

/// One discovered descendant and what to animate it toward.
#[derive(Debug, Clone)]
pub struct PropagatedNode<N> {
    pub node: N,
    /// Levels below the root, starting at 1.
    pub depth: usize,
    /// Compensated geometry target.
    pub target: PartialState,
    pub transition: TransitionSpec,
}

/// Discover marked descendants of `root` and compute their targets.
///
/// Transitions are taken from the marker's own variant, then `fallback`, then
/// the default spring. Every transition is validated here, so an error is
/// returned before the caller builds anything.
pub fn propagate<N: MotionNode>(
    root: &N,
    root_target: &PartialState,
    table: &VariantTable,
    depth: PropagationDepth,
    fallback: Option<&TransitionConfig>,
) -> Result<Vec<PropagatedNode<N>>> {
    let mut found = Vec::new();
    let mut stack: Vec<(N, usize)> = root.children().into_iter().rev().map(|c| (c, 1)).collect();

    while let Some((node, level)) = stack.pop() {
        if let Some(marker) = node.marker() {
            let resolved = resolve(&marker, table)?;
            let target = compensate(&resolved.state.geometry(), root_target);
            let transition = match resolved.transition.as_ref().or(fallback) {
                Some(config) => TransitionSpec::from_config(config)?,
                None => TransitionSpec::default(),
            };

            trace!(depth = level, ?marker, ?target, "propagated variant to descendant");
            found.push(PropagatedNode {
                node: node.clone(),
                depth: level,
                target,
                transition,
            });
        }

        if level < depth.levels() {
            stack.extend(node.children().into_iter().rev().map(|c| (c, level + 1)));
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionKind;
    use crate::tree::{geometry_marker, Element};
    use crate::variant::Variant;

    fn table() -> VariantTable {
        VariantTable::new()
            .with(
                "lift",
                Variant::new(PartialState::new().with_scale(2.0).with_y(-4.0).with_opacity(0.5)),
            )
            .with(
                "spin",
                Variant::new(PartialState::new().with_rotate(90.0))
                    .with_transition(TransitionConfig::tween(120.0)),
            )
    }

    fn ids(nodes: &[PropagatedNode<Element>]) -> Vec<&str> {
        nodes.iter().map(|n| n.node.id()).collect()
    }

    #[test]
    fn test_two_levels_by_default() {
        let deep = Element::new("great").with_marker("lift");
        let grandchild = Element::new("grand").with_marker("lift").with_child(deep);
        let child = Element::new("child").with_marker("spin").with_child(grandchild);
        let root = Element::new("root").with_child(child);

        let found = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::default(),
            None,
        )
        .unwrap();
        assert_eq!(ids(&found), vec!["child", "grand"]);
        assert_eq!(found[1].depth, 2);
    }

    #[test]
    fn test_unmarked_nodes_do_not_block() {
        let grandchild = Element::new("grand").with_marker("lift");
        let child = Element::new("plain").with_child(grandchild);
        let sibling = Element::new("sib").with_marker("spin");
        let root = Element::new("root").with_child(child).with_child(sibling);

        let found = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::COMPAT,
            None,
        )
        .unwrap();
        assert_eq!(ids(&found), vec!["grand", "sib"]);
    }

    #[test]
    fn test_configurable_depth() {
        let l3 = Element::new("l3").with_marker("lift");
        let l2 = Element::new("l2").with_child(l3);
        let l1 = Element::new("l1").with_marker("lift").with_child(l2);
        let root = Element::new("root").with_child(l1);

        let shallow = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::new(1).unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(ids(&shallow), vec!["l1"]);

        let all = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::UNBOUNDED,
            None,
        )
        .unwrap();
        assert_eq!(ids(&all), vec!["l1", "l3"]);
        assert_eq!(PropagationDepth::new(0), Err(MotionError::InvalidPropagationDepth));
    }

    #[test]
    fn test_targets_are_compensated_geometry() {
        let root = Element::new("root").with_child(Element::new("c").with_marker("lift"));
        let root_target = PartialState::new().with_scale(3.0).with_rotate(10.0);

        let found = propagate(
            &root,
            &root_target,
            &table(),
            PropagationDepth::COMPAT,
            None,
        )
        .unwrap();
        let target = found[0].target;
        assert_eq!(target.scale, Some(-1.0));
        assert_eq!(target.rotate, Some(-10.0));
        assert_eq!(target.y, Some(-4.0));
        assert_eq!(target.opacity, None);
    }

    #[test]
    fn test_literal_marker() {
        let root = Element::new("root").with_child(
            Element::new("c").with_marker(geometry_marker(PartialState::new().with_x(7.0))),
        );
        let found = propagate(
            &root,
            &PartialState::new().with_scale(1.0),
            &table(),
            PropagationDepth::COMPAT,
            None,
        )
        .unwrap();
        assert_eq!(found[0].target, PartialState::new().with_x(7.0));
    }

    #[test]
    fn test_transition_precedence() {
        let root = Element::new("root")
            .with_child(Element::new("own").with_marker("spin"))
            .with_child(Element::new("inherits").with_marker("lift"));

        let fallback = TransitionConfig::tween(300.0);
        let found = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::COMPAT,
            Some(&fallback),
        )
        .unwrap();
        assert_eq!(found[0].transition.kind(), TransitionKind::Tween);
        assert_eq!(found[1].transition.kind(), TransitionKind::Tween);

        let found = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::COMPAT,
            None,
        )
        .unwrap();
        assert_eq!(found[1].transition.kind(), TransitionKind::Spring);
    }

    #[test]
    fn test_unknown_marker_variant_errors() {
        let root = Element::new("root").with_child(Element::new("c").with_marker("missing"));
        let err = propagate(
            &root,
            &PartialState::new(),
            &table(),
            PropagationDepth::COMPAT,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            MotionError::UnknownVariant {
                name: "missing".into()
            }
        );
    }
}
