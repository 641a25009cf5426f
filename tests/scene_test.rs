//! Tests for the uniform SceneArena operations

use rstest::rstest;

use rsdraw::arena::Index;
use rsdraw::{Element, ElementKind, SceneArena, SceneError};

#[ctor::ctor]
fn init() {
    rsdraw::util::testing::init_test_setup();
}

/// Helper to capture draw output as one string per line
fn draw_lines(arena: &SceneArena, root: Index) -> Vec<String> {
    let mut buf = Vec::new();
    arena.draw(root, &mut buf).expect("draw should succeed");
    String::from_utf8(buf)
        .expect("draw output is utf8")
        .lines()
        .map(str::to_string)
        .collect()
}

/// root[A, sub[B1, B2], C] — returns (arena, root, handle of C)
fn build_walkthrough_scene() -> (SceneArena, Index, Index) {
    let mut arena = SceneArena::new();
    let root = arena.add_group("root");
    let line_a = arena.add_line("A");
    let sub = arena.add_group("sub");
    let circle_b1 = arena.add_circle("B1");
    let circle_b2 = arena.add_circle("B2");
    let line_c = arena.add_line("C");

    arena.add_child(root, line_a).unwrap();
    arena.add_child(root, sub).unwrap();
    arena.add_child(sub, circle_b1).unwrap();
    arena.add_child(sub, circle_b2).unwrap();
    arena.add_child(root, line_c).unwrap();

    (arena, root, line_c)
}

// ============================================================
// Atomic Element Contract Tests
// ============================================================

#[rstest]
#[case::line(ElementKind::Line)]
#[case::circle(ElementKind::Circle)]
fn given_atomic_element_when_adding_child_then_fails_with_unsupported_operation(
    #[case] kind: ElementKind,
) {
    // Arrange
    let mut arena = SceneArena::new();
    let leaf = arena.insert(Element::new("X", kind));
    let other = arena.add_line("Y");

    // Act
    let result = arena.add_child(leaf, other);

    // Assert
    assert!(matches!(
        result,
        Err(SceneError::UnsupportedOperation { op: "add", .. })
    ));
}

#[rstest]
#[case::line(ElementKind::Line)]
#[case::circle(ElementKind::Circle)]
fn given_atomic_element_when_removing_child_then_fails_with_unsupported_operation(
    #[case] kind: ElementKind,
) {
    // Arrange
    let mut arena = SceneArena::new();
    let leaf = arena.insert(Element::new("X", kind));
    let other = arena.add_line("Y");

    // Act
    let result = arena.remove_child(leaf, other);

    // Assert
    assert!(matches!(
        result,
        Err(SceneError::UnsupportedOperation { op: "remove", .. })
    ));
}

#[test]
fn given_failed_add_on_leaf_then_no_state_is_mutated() {
    // Arrange
    let (mut arena, root, _) = build_walkthrough_scene();
    let before = draw_lines(&arena, root);
    let leaf = arena
        .iter_from(root)
        .find(|(_, node)| node.element.name == "A")
        .map(|(idx, _)| idx)
        .expect("A is in the scene");
    let stray = arena.add_circle("stray");

    // Act
    let result = arena.add_child(leaf, stray);

    // Assert
    assert!(result.is_err());
    assert!(arena.get(leaf).unwrap().children.is_empty());
    assert_eq!(draw_lines(&arena, root), before);
}

#[test]
fn given_leaf_when_drawing_then_emits_its_name() {
    // Arrange
    let mut arena = SceneArena::new();
    let leaf = arena.add_line("solo");

    // Act / Assert
    assert_eq!(draw_lines(&arena, leaf), vec!["solo"]);
}

// ============================================================
// Group Mutation Tests
// ============================================================

#[test]
fn given_group_when_adding_child_then_child_appears_at_end() {
    // Arrange
    let mut arena = SceneArena::new();
    let group = arena.add_group("g");
    let a = arena.add_line("A");
    let b = arena.add_circle("B");
    arena.add_child(group, a).unwrap();
    arena.add_child(group, b).unwrap();

    // Act
    let d = arena.add_line("D");
    arena.add_child(group, d).unwrap();

    // Assert
    assert_eq!(draw_lines(&arena, group), vec!["A", "B", "D"]);
    assert_eq!(arena.get(d).unwrap().parent, Some(group));
}

#[test]
fn given_group_when_adding_same_child_twice_then_drawn_twice() {
    // Arrange
    let mut arena = SceneArena::new();
    let group = arena.add_group("g");
    let a = arena.add_line("A");
    let x = arena.add_circle("X");
    arena.add_child(group, a).unwrap();

    // Act - duplicates are permitted, not deduplicated
    arena.add_child(group, x).unwrap();
    arena.add_child(group, x).unwrap();

    // Assert
    assert_eq!(draw_lines(&arena, group), vec!["A", "X", "X"]);
}

#[test]
fn given_group_when_removing_absent_child_then_silent_noop() {
    // Arrange
    let mut arena = SceneArena::new();
    let group = arena.add_group("g");
    let a = arena.add_line("A");
    let absent = arena.add_line("absent");
    arena.add_child(group, a).unwrap();

    // Act
    let result = arena.remove_child(group, absent);

    // Assert
    assert!(result.is_ok());
    assert_eq!(draw_lines(&arena, group), vec!["A"]);
}

#[test]
fn given_group_when_removing_middle_child_then_order_of_rest_preserved() {
    // Arrange
    let mut arena = SceneArena::new();
    let group = arena.add_group("g");
    let a = arena.add_line("A");
    let b = arena.add_circle("B");
    let c = arena.add_line("C");
    arena.add_child(group, a).unwrap();
    arena.add_child(group, b).unwrap();
    arena.add_child(group, c).unwrap();

    // Act
    arena.remove_child(group, b).unwrap();

    // Assert - traversal follows current insertion order, not creation order
    assert_eq!(draw_lines(&arena, group), vec!["A", "C"]);
    assert_eq!(arena.get(b).unwrap().parent, None);
}

#[test]
fn given_duplicate_child_when_removing_then_only_first_occurrence_goes() {
    // Arrange
    let mut arena = SceneArena::new();
    let group = arena.add_group("g");
    let x = arena.add_line("X");
    arena.add_child(group, x).unwrap();
    arena.add_child(group, x).unwrap();

    // Act
    arena.remove_child(group, x).unwrap();

    // Assert
    assert_eq!(draw_lines(&arena, group), vec!["X"]);
}

// ============================================================
// Traversal Order Tests
// ============================================================

#[test]
fn given_nested_groups_when_drawing_then_depth_first_in_insertion_order() {
    // Arrange
    let (arena, root, _) = build_walkthrough_scene();

    // Act / Assert
    assert_eq!(draw_lines(&arena, root), vec!["A", "B1", "B2", "C"]);
}

#[test]
fn given_walkthrough_scene_when_removing_then_redraw_omits_removed() {
    // Arrange
    let (mut arena, root, line_c) = build_walkthrough_scene();

    // Act
    arena.remove_child(root, line_c).unwrap();

    // Assert
    assert_eq!(draw_lines(&arena, root), vec!["A", "B1", "B2"]);
}

#[test]
fn given_empty_group_when_drawing_then_emits_nothing() {
    // Arrange
    let mut arena = SceneArena::new();
    let group = arena.add_group("empty");

    // Act / Assert
    assert!(draw_lines(&arena, group).is_empty());
}

#[test]
fn given_shared_child_when_drawing_both_parents_then_appears_in_both() {
    // Arrange - one handle may sit in several groups' child lists
    let mut arena = SceneArena::new();
    let root = arena.add_group("root");
    let left = arena.add_group("left");
    let right = arena.add_group("right");
    let shared = arena.add_circle("shared");
    arena.add_child(root, left).unwrap();
    arena.add_child(root, right).unwrap();
    arena.add_child(left, shared).unwrap();
    arena.add_child(right, shared).unwrap();

    // Act / Assert
    assert_eq!(draw_lines(&arena, root), vec!["shared", "shared"]);
}

#[test]
fn given_scene_when_iterating_then_visits_all_nodes_preorder() {
    // Arrange
    let (arena, root, _) = build_walkthrough_scene();

    // Act
    let names: Vec<String> = arena
        .iter_from(root)
        .map(|(_, node)| node.element.name.clone())
        .collect();

    // Assert
    assert_eq!(names, vec!["root", "A", "sub", "B1", "B2", "C"]);
}

// ============================================================
// Structure Query Tests
// ============================================================

#[test]
fn given_walkthrough_scene_when_querying_then_depth_and_leaves_match() {
    // Arrange
    let (arena, root, _) = build_walkthrough_scene();

    // Act / Assert
    assert_eq!(arena.depth(root), 3);
    assert_eq!(arena.leaf_names(root), vec!["A", "B1", "B2", "C"]);
    assert_eq!(arena.len(), 6);
}

#[test]
fn given_childless_group_when_collecting_leaves_then_contributes_nothing() {
    // Arrange - an empty group is not an atomic element
    let mut arena = SceneArena::new();
    let root = arena.add_group("root");
    let empty = arena.add_group("empty");
    let a = arena.add_line("A");
    arena.add_child(root, empty).unwrap();
    arena.add_child(root, a).unwrap();

    // Act / Assert
    assert_eq!(arena.leaf_names(root), vec!["A"]);
}

#[test]
fn given_scene_when_rendering_termtree_then_groups_get_slash_suffix() {
    // Arrange
    let (arena, root, _) = build_walkthrough_scene();

    // Act
    let rendered = arena.to_termtree(root).expect("root exists").to_string();

    // Assert
    assert!(rendered.starts_with("root/"));
    assert!(rendered.contains("sub/"));
    assert!(rendered.contains("B1"));
    assert!(!rendered.contains("A/"));
}
