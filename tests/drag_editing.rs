// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Integration tests for vertex dragging through the editor

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use polyedit::edit::drag::weight;
use polyedit::edit::ElementType;
use polyedit::geometry::{AdjacencyIndex, Mesh, Primitive};
use polyedit::{EditError, Editor, ObjectId};

fn triangle_editor() -> (Editor, ObjectId) {
    let mesh = Mesh::from_buffers(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();
    let mut editor = Editor::new();
    let id = editor.add_mesh(mesh);
    (editor, id)
}

fn positions(editor: &Editor, id: ObjectId) -> Vec<Point3<f64>> {
    editor.mesh(id).unwrap().positions().collect()
}

#[test]
fn test_single_triangle_scenario() {
    let (mut editor, id) = triangle_editor();

    editor.pick(id, 0, Point3::new(0.0, 0.0, 0.0)).unwrap();
    let neighbors: Vec<usize> = editor
        .drag()
        .session()
        .unwrap()
        .neighbors()
        .iter()
        .map(|n| n.index)
        .collect();
    assert_eq!(neighbors, vec![1, 2]);

    editor.move_to(Point3::new(1.0, 0.0, 0.0)).unwrap();
    let mesh = editor.mesh(id).unwrap();
    assert_relative_eq!(mesh.position(0).unwrap(), Point3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(mesh.position(1).unwrap(), Point3::new(1.5, 0.0, 0.0));
    assert_relative_eq!(mesh.position(2).unwrap(), Point3::new(0.5, 1.0, 0.0));
}

#[test]
fn test_pick_and_release_changes_nothing() {
    let mut editor = Editor::new();
    let sphere = editor.add_primitive(&Primitive::sphere(2.0, 12));
    let before = positions(&editor, sphere);

    editor.pick(sphere, 17, Point3::new(0.3, 1.9, 0.1)).unwrap();
    editor.release();

    assert_eq!(positions(&editor, sphere), before);
    assert!(!editor.drag().is_dragging());
}

#[test]
fn test_neighbors_follow_weighted_delta() {
    let mut editor = Editor::new();
    let sphere = editor.add_primitive(&Primitive::sphere(2.0, 12));
    let before = positions(&editor, sphere);
    let vertex = 30;
    let pick_point = before[vertex] + Vector3::new(0.05, -0.02, 0.01);

    editor.pick(sphere, vertex, pick_point).unwrap();
    let influences = editor.drag().session().unwrap().neighbors().to_vec();
    assert!(!influences.is_empty());

    for target in [
        Point3::new(0.5, 2.5, -1.0),
        Point3::new(-3.0, 0.0, 4.0),
        before[vertex],
    ] {
        editor.move_to(target).unwrap();
        let after = positions(&editor, sphere);
        let delta = target - pick_point;

        assert_relative_eq!(after[vertex], target, epsilon = 1e-12);
        for n in &influences {
            let expected = before[n.index] + delta * n.weight;
            assert_relative_eq!(after[n.index], expected, epsilon = 1e-12);
            assert_relative_eq!(
                n.weight,
                weight((before[n.index] - pick_point).norm()),
                epsilon = 1e-15
            );
        }
    }
}

#[test]
fn test_offset_pick_does_not_jump_neighbors() {
    let (mut editor, id) = triangle_editor();
    let before = positions(&editor, id);
    let pick_point = Point3::new(0.2, 0.0, 0.0);

    editor.pick(id, 0, pick_point).unwrap();
    editor.move_to(pick_point).unwrap();
    let after = positions(&editor, id);

    assert_relative_eq!(after[0], pick_point, epsilon = 1e-12);
    assert_relative_eq!(after[1], before[1], epsilon = 1e-12);
    assert_relative_eq!(after[2], before[2], epsilon = 1e-12);
}

#[test]
fn test_only_one_ring_moves() {
    let mut editor = Editor::new();
    let sphere = editor.add_primitive(&Primitive::sphere(1.0, 16));
    let before = positions(&editor, sphere);
    let adjacency = AdjacencyIndex::build(editor.mesh(sphere).unwrap());
    let vertex = 40;

    editor.pick(sphere, vertex, before[vertex]).unwrap();
    editor.move_to(before[vertex] + Vector3::new(0.0, 0.5, 0.0)).unwrap();
    let after = positions(&editor, sphere);

    for (i, (a, b)) in before.iter().zip(&after).enumerate() {
        let in_ring = i == vertex || adjacency.neighbors_of(vertex).any(|n| n == i);
        assert_eq!(a != b, in_ring, "vertex {i}");
    }
}

#[test]
fn test_weights_decrease_with_distance() {
    let distances = [0.0, 0.1, 0.5, 1.0, 2.5, 10.0, 1e6];
    for pair in distances.windows(2) {
        assert!(weight(pair[0]) > weight(pair[1]));
    }
}

#[test]
fn test_normals_and_bounds_follow_drag() {
    let (mut editor, id) = triangle_editor();
    editor.pick(id, 2, Point3::new(0.0, 1.0, 0.0)).unwrap();
    editor.move_to(Point3::new(0.0, 1.0, 3.0)).unwrap();

    let mesh = editor.mesh(id).unwrap();
    assert!(mesh.is_consistent());
    assert_relative_eq!(mesh.bounds().max.z, 3.0);
    assert!(mesh.normals().all(|n| n.z < 1.0));
}

#[test]
fn test_move_without_session_is_noop() {
    let (mut editor, id) = triangle_editor();
    let before = positions(&editor, id);

    editor.move_to(Point3::new(5.0, 5.0, 5.0)).unwrap();
    editor.pick(id, 0, Point3::origin()).unwrap();
    editor.release();
    editor.move_to(Point3::new(5.0, 5.0, 5.0)).unwrap();

    assert_eq!(positions(&editor, id), before);
}

#[test]
fn test_bad_vertex_pick_is_atomic() {
    let (mut editor, id) = triangle_editor();
    editor.pick_element(id, ElementType::Vertex, vec![1]);

    let err = editor.pick(id, 3, Point3::origin()).unwrap_err();
    assert_eq!(err, EditError::IndexOutOfRange { index: 3, len: 3 });
    assert!(!editor.drag().is_dragging());
    assert_eq!(editor.selection().vertices(), &[1]);
}

#[test]
fn test_new_pick_replaces_session() {
    let mut editor = Editor::new();
    let a = editor.add_primitive(&Primitive::tetrahedron(1.0));
    let b = editor.add_primitive(&Primitive::tetrahedron(1.0));
    let before_a = positions(&editor, a);

    editor.pick(a, 0, Point3::origin()).unwrap();
    editor.pick(b, 1, Point3::origin()).unwrap();
    editor.move_to(Point3::new(2.0, 2.0, 2.0)).unwrap();

    assert_eq!(positions(&editor, a), before_a);
    assert_relative_eq!(
        editor.mesh(b).unwrap().position(1).unwrap(),
        Point3::new(2.0, 2.0, 2.0),
        epsilon = 1e-12
    );
    assert_eq!(editor.selected_object(), Some(b));
}

#[test]
fn test_soup_drag_moves_only_the_vertex() {
    let mut editor = Editor::new();
    let soup = editor.add_mesh(Mesh::from_soup(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]));

    editor.pick(soup, 1, Point3::new(1.0, 0.0, 0.0)).unwrap();
    editor.move_to(Point3::new(2.0, 0.0, 0.0)).unwrap();

    let mesh = editor.mesh(soup).unwrap();
    assert_eq!(mesh.position(1), Some(Point3::new(2.0, 0.0, 0.0)));
    assert_eq!(mesh.position(0), Some(Point3::new(0.0, 0.0, 0.0)));
}

#[test]
fn test_adjacency_rebuild_is_idempotent() {
    let mesh = Primitive::cylinder(3.0, 1.0, 24).to_mesh();
    let first = AdjacencyIndex::build(&mesh);
    let second = AdjacencyIndex::build(&mesh);
    assert_eq!(first, second);
    assert_eq!(
        first.neighbors_of(0).collect::<Vec<_>>(),
        second.neighbors_of(0).collect::<Vec<_>>()
    );
}

#[test]
fn test_selected_edge_endpoints() {
    let (mut editor, id) = triangle_editor();
    editor.pick_element(id, ElementType::Edge, vec![2, 0, 9]);

    let endpoints: Vec<(usize, usize)> = editor
        .selected_edge_endpoints()
        .into_iter()
        .map(|e| (e.v0, e.v1))
        .collect();
    assert_eq!(endpoints, vec![(1, 2), (0, 1)]);
}
