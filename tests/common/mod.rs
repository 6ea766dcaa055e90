#![allow(dead_code)]

use blackwood::{Blackwood, NodeColor, NodeIndex};
use simplelog::{Config, LevelFilter, TestLogger};

pub const REFERENCE_KEYS: [i32; 8] = [20, 15, 10, 25, 30, 5, 35, 1];

/// Routes the tree's trace output to the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

pub fn tree_of(keys: &[i32]) -> Blackwood<i32> {
    let mut tree = Blackwood::new();
    for &key in keys {
        tree.insert(key);
        assert!(tree.is_valid(), "tree invalid after inserting {key}");
    }
    tree
}

/// Pre-order listing of `(key, color)` built from the public structural view, with `'r'`
/// and `'b'` standing for the colors.
pub fn colored_preorder(tree: &Blackwood<i32>) -> Vec<(i32, char)> {
    fn walk(tree: &Blackwood<i32>, node: Option<NodeIndex>, out: &mut Vec<(i32, char)>) {
        let Some(node) = node else {
            return;
        };
        let view = tree.node(node).unwrap();
        let color = match view.color() {
            NodeColor::Red => 'r',
            NodeColor::Black => 'b',
        };

        out.push((*view.key(), color));
        walk(tree, view.left(), out);
        walk(tree, view.right(), out);
    }

    let mut out = Vec::new();
    walk(tree, tree.root(), &mut out);
    out
}

pub fn key_of(tree: &Blackwood<i32>, node: Option<NodeIndex>) -> Option<i32> {
    node.map(|node| *tree.key(node).unwrap())
}
