use crate::ast::for_each_child;
use crate::ast::NodeId;
use crate::ast::NodeMap;

pub struct JourneyControls {
    skip: bool,
}

impl JourneyControls {
    /// Prevents descent into the current node's children. The up handler
    /// still runs.
    pub fn skip(&mut self) {
        self.skip = true;
    }
}

/// Depth-first traversal over a tree. The down handler runs before children
/// and may rewrite the current node's syntax; children are collected after it
/// returns, so wrapping or replacing children from the down handler is safe.
pub trait Visitor {
    #[allow(unused_variables)]
    fn on_down(
        &mut self,
        map: &mut NodeMap,
        node: NodeId,
        parent: Option<NodeId>,
        ctl: &mut JourneyControls,
    ) {
    }

    #[allow(unused_variables)]
    fn on_up(&mut self, map: &mut NodeMap, node: NodeId, parent: Option<NodeId>) {}
}

pub fn visit_node<V: Visitor>(visitor: &mut V, map: &mut NodeMap, node: NodeId) {
    visit_from(visitor, map, node, None);
}

fn visit_from<V: Visitor>(
    visitor: &mut V,
    map: &mut NodeMap,
    node: NodeId,
    parent: Option<NodeId>,
) {
    let mut ctl = JourneyControls { skip: false };
    visitor.on_down(map, node, parent, &mut ctl);
    if !ctl.skip {
        let mut children = Vec::<NodeId>::new();
        for_each_child(map[node].stx(), |c| children.push(c));
        for c in children {
            visit_from(visitor, map, c, Some(node));
        }
    };
    visitor.on_up(map, node, parent);
}
