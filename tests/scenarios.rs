mod common;

use blackwood::{Blackwood, Direction, NodeColor, RemoveOutcome, TraversalOrder, TreeError};
use common::{REFERENCE_KEYS, colored_preorder, init_logging, key_of, tree_of};

#[test]
fn reference_insertions_shape() {
    init_logging();
    let tree = tree_of(&REFERENCE_KEYS);

    let root = tree.node(tree.root().unwrap()).unwrap();
    assert_eq!(*root.key(), 15);
    assert_eq!(root.color(), NodeColor::Black);
    assert_eq!(root.parent(), None);

    let left = tree.node(root.left().unwrap()).unwrap();
    assert_eq!((*left.key(), left.color()), (5, NodeColor::Black));
    let right = tree.node(root.right().unwrap()).unwrap();
    assert_eq!((*right.key(), right.color()), (25, NodeColor::Red));
    assert_eq!(right.parent(), Some(root.index()));

    let thirty = tree.node(right.child(Direction::Right).unwrap()).unwrap();
    assert_eq!(thirty.left(), None);
    assert_eq!(key_of(&tree, thirty.right()), Some(35));

    assert_eq!(
        colored_preorder(&tree),
        [
            (15, 'b'),
            (5, 'b'),
            (1, 'r'),
            (10, 'r'),
            (25, 'r'),
            (20, 'b'),
            (30, 'b'),
            (35, 'r'),
        ]
    );
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn further_insertions_move_the_root() {
    init_logging();
    let mut tree = tree_of(&REFERENCE_KEYS);
    tree.extend([2025, 1410, 966, 1918]);

    assert!(tree.is_valid());
    assert_eq!(
        colored_preorder(&tree),
        [
            (25, 'b'),
            (15, 'b'),
            (5, 'b'),
            (1, 'r'),
            (10, 'r'),
            (20, 'b'),
            (35, 'b'),
            (30, 'b'),
            (1410, 'r'),
            (966, 'b'),
            (2025, 'b'),
            (1918, 'r'),
        ]
    );
}

#[test]
fn reference_queries() {
    let tree = tree_of(&REFERENCE_KEYS);

    let ten = tree.search(&10).unwrap();
    assert_eq!(key_of(&tree, tree.successor(ten).unwrap()), Some(15));
    let thirty = tree.search(&30).unwrap();
    assert_eq!(key_of(&tree, tree.predecessor(thirty).unwrap()), Some(25));

    assert_eq!(key_of(&tree, tree.minimum()), Some(1));
    assert_eq!(key_of(&tree, tree.maximum()), Some(35));
    assert_eq!(tree.successor(tree.maximum().unwrap()), Ok(None));
    assert_eq!(tree.predecessor(tree.minimum().unwrap()), Ok(None));
    assert_eq!(tree.height(), 3);
    assert_eq!(tree.count(), 8);

    for key in REFERENCE_KEYS {
        let node = tree.search(&key).unwrap();
        assert_eq!(*tree.key(node).unwrap(), key);
    }
    for missing in [100, 39, 2025, 0] {
        assert_eq!(tree.search(&missing), None);
    }
}

#[test]
fn subtree_counts() {
    let tree = tree_of(&REFERENCE_KEYS);

    let count_at = |key: i32| tree.subtree_count(tree.search(&key).unwrap()).unwrap();
    assert_eq!(count_at(5), 3);
    assert_eq!(count_at(25), 4);
    assert_eq!(count_at(35), 1);
    assert_eq!(tree.search(&1001), None);
}

#[test]
fn traversal_orders_after_mixed_insertions() {
    let mut tree = tree_of(&REFERENCE_KEYS);
    tree.extend([100, -5, 312, 511, 2, 8, 16, 100]);
    assert!(tree.is_valid());

    let walk = |order| tree.traverse(order).copied().collect::<Vec<_>>();
    assert_eq!(
        walk(TraversalOrder::InOrder),
        [-5, 1, 2, 5, 8, 10, 15, 16, 20, 25, 30, 35, 100, 312, 511]
    );
    assert_eq!(
        walk(TraversalOrder::PreOrder),
        [15, 5, 1, -5, 2, 10, 8, 25, 20, 16, 35, 30, 312, 100, 511]
    );
    assert_eq!(
        walk(TraversalOrder::PostOrder),
        [-5, 2, 1, 8, 10, 5, 16, 20, 30, 100, 511, 312, 35, 25, 15]
    );
}

#[test]
fn remove_node_with_two_children() {
    init_logging();
    let mut tree = tree_of(&REFERENCE_KEYS);

    assert_eq!(tree.remove(&20), RemoveOutcome::Removed);
    assert!(tree.contains(&15));
    assert!(tree.contains(&25));
    assert!(tree.is_valid());
    assert_eq!(tree.count(), 7);
    assert_eq!(
        colored_preorder(&tree),
        [
            (15, 'b'),
            (5, 'b'),
            (1, 'r'),
            (10, 'r'),
            (30, 'r'),
            (25, 'b'),
            (35, 'b'),
        ]
    );
}

#[test]
fn removal_sequence_with_missing_keys() {
    let mut tree = tree_of(&REFERENCE_KEYS);
    tree.extend([98, -2, 0, 8, 55, 32, 98, 123, -1, -9]);
    assert!(tree.is_valid());

    for key in [98, 15, 123, 22222, 30] {
        tree.remove(&key);
    }

    assert!(tree.is_valid());
    assert_eq!(tree.validate(), Ok(()));
    for key in [98, 15, 123, 22222, 30] {
        assert_eq!(tree.search(&key), None);
    }
    assert_eq!(tree.height(), 4);
    assert_eq!(tree.remove(&22222), RemoveOutcome::NotFound);
}

#[test]
fn remove_every_reference_key() {
    init_logging();
    let mut tree = tree_of(&REFERENCE_KEYS);

    for (removed, key) in REFERENCE_KEYS.into_iter().enumerate() {
        assert_eq!(tree.remove(&key), RemoveOutcome::Removed);
        assert!(tree.is_valid(), "tree invalid after removing {key}");
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree.count(), REFERENCE_KEYS.len() - removed - 1);
    }

    assert_eq!(tree.root(), None);
    assert_eq!(tree.count(), 0);
    assert_eq!(tree.height(), -1);
}

#[test]
fn extremes_follow_updates() {
    let mut tree = tree_of(&REFERENCE_KEYS);

    tree.remove(&1);
    assert!(tree.is_valid());
    assert_eq!(tree.first(), Some(&5));
    let min = tree.minimum().unwrap();
    assert_eq!(key_of(&tree, tree.successor(min).unwrap()), Some(10));

    tree.insert(44);
    assert!(tree.is_valid());
    assert_eq!(tree.last(), Some(&44));
    let max = tree.maximum().unwrap();
    assert_eq!(key_of(&tree, tree.predecessor(max).unwrap()), Some(35));
}

#[test]
fn height_follows_updates() {
    let mut tree = tree_of(&REFERENCE_KEYS);

    tree.remove(&30);
    tree.remove(&15);
    assert!(tree.is_valid());
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.count(), 6);

    tree.extend([100, 200, 500]);
    assert!(tree.is_valid());
    assert_eq!(tree.height(), 3);
}

#[test]
fn clear_releases_everything() {
    let mut tree = tree_of(&REFERENCE_KEYS);
    let fifteen = tree.search(&15).unwrap();

    tree.clear();
    assert!(tree.is_valid());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.count(), 0);
    assert_eq!(tree.node(fifteen).unwrap_err(), TreeError::DetachedNode(fifteen));
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn stale_handles_are_reported() {
    let mut tree = tree_of(&REFERENCE_KEYS);
    let thirty_five = tree.search(&35).unwrap();
    tree.remove(&35);

    let detached = Err(TreeError::DetachedNode(thirty_five));
    assert_eq!(tree.successor(thirty_five), detached);
    assert_eq!(tree.predecessor(thirty_five), detached);
    assert_eq!(
        tree.subtree_minimum(thirty_five),
        Err(TreeError::DetachedNode(thirty_five))
    );
    assert_eq!(
        tree.rotate_left(thirty_five),
        Err(TreeError::DetachedNode(thirty_five))
    );
}

#[test]
fn rotation_without_child_is_refused() {
    let mut tree = tree_of(&REFERENCE_KEYS);
    let twenty = tree.search(&20).unwrap();

    assert_eq!(
        tree.rotate_left(twenty),
        Err(TreeError::MissingRotationChild {
            node: twenty,
            missing: Direction::Right,
        })
    );
    assert_eq!(colored_preorder(&tree)[0], (15, 'b'));

    let error = tree.rotate_right(twenty).unwrap_err();
    assert!(error.to_string().contains("no left child"));
}

#[test]
fn string_keys() {
    let mut tree: Blackwood<String> = ["kiwi", "apple", "mango", "banana"]
        .into_iter()
        .map(String::from)
        .collect();

    assert!(tree.remove("apple").is_removed());
    assert_eq!(tree.take("kiwi"), Some(String::from("kiwi")));
    assert_eq!(tree.iter().map(String::as_str).collect::<Vec<_>>(), ["banana", "mango"]);
    assert_eq!(tree.validate(), Ok(()));
}
