//! Reports which parts of a new tree differ from an old one.
//!
//! The walk is driven by green reference equality: a subtree shared by both
//! trees is skipped without being looked at, so the cost is proportional to
//! what changed.

use super::green::GreenElement;
use super::red::{SyntaxElement, SyntaxNode};

/// Elements of `new` that are not shared with `old`, in pre-order.
///
/// A changed node is reported and then compared child by child. Children
/// of the same kind at the same position are compared recursively; any
/// other new child is reported together with its whole subtree.
pub fn diff(old: &SyntaxNode, new: &SyntaxNode) -> Vec<SyntaxElement> {
    let mut out = Vec::new();
    diff_nodes(old, new, &mut out);
    out
}

fn diff_nodes(old: &SyntaxNode, new: &SyntaxNode, out: &mut Vec<SyntaxElement>) {
    if old.green().ptr_eq(new.green()) {
        return;
    }
    out.push(SyntaxElement::Node(new.clone()));

    let old_children: Vec<&GreenElement> = old.green().children().collect();
    let new_children: Vec<&GreenElement> = new.green().children().collect();

    let prefix = old_children
        .iter()
        .zip(&new_children)
        .take_while(|(a, b)| a.ptr_eq(b))
        .count();
    let max_suffix = old_children.len().min(new_children.len()) - prefix;
    let suffix = old_children
        .iter()
        .rev()
        .zip(new_children.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a.ptr_eq(b))
        .count();

    let old_middle = &old_children[prefix..old_children.len() - suffix];
    let new_middle = prefix..new_children.len() - suffix;

    for (pair_index, new_index) in new_middle.enumerate() {
        let new_green = new_children[new_index];
        // Shifted but identical
        if old_middle.iter().any(|o| o.ptr_eq(new_green)) {
            continue;
        }
        let Some(new_child) = new.child(new_index) else {
            continue;
        };
        let paired_old = old_middle
            .get(pair_index)
            .filter(|o| o.kind() == new_green.kind() && o.as_node().is_some() && new_green.as_node().is_some())
            .and_then(|_| old.child(prefix + pair_index))
            .and_then(SyntaxElement::into_node);
        match (paired_old, new_child) {
            (Some(old_node), SyntaxElement::Node(new_node)) => diff_nodes(&old_node, &new_node, out),
            (_, new_child) => push_subtree(new_child, out),
        }
    }
}

fn push_subtree(element: SyntaxElement, out: &mut Vec<SyntaxElement>) {
    match element {
        SyntaxElement::Node(node) => out.extend(node.descendants_with_tokens()),
        token => out.push(token),
    }
}
