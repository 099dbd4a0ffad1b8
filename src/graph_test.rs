use crate::error::Error;
use crate::graph::{Edge, Graph};

fn make_graph(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
    let mut graph = Graph::new(n);
    for &(u, v, w) in edges.iter() {
        assert_eq!(graph.add_edge(u, v, w), Ok(true));
    }
    graph
}

fn diamond() -> Graph {
    make_graph(
        5,
        &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0), (3, 4, 1.0)],
    )
}

#[test]
fn test_edges() {
    let mut graph = diamond();
    assert_eq!(graph.vertex_count(), 5);
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.weight(0, 2), Ok(Some(1.0)));
    assert_eq!(graph.weight(2, 0), Ok(None));

    assert_eq!(graph.add_edge(0, 2, 7.5), Ok(false));
    assert_eq!(graph.edge_count(), 5);
    assert_eq!(graph.weight(0, 2), Ok(Some(7.5)));

    let ends: Vec<usize> = graph.neighbours(0).unwrap().iter().map(|e| e.to).collect();
    assert_eq!(ends, vec![1, 2]);

    assert_eq!(graph.remove_edge(0, 2), Ok(7.5));
    assert_eq!(graph.remove_edge(0, 2), Err(Error::KeyNotFound));
    assert_eq!(graph.edge_count(), 4);

    let err = Error::InvalidIndex { index: 9, len: 5 };
    assert_eq!(graph.add_edge(0, 9, 1.0), Err(err.clone()));
    assert_eq!(graph.weight(9, 0), Err(err.clone()));
    assert_eq!(graph.bfs(9), Err(err));

    let v = graph.add_vertex();
    assert_eq!(v, 5);
    assert_eq!(graph.neighbours(5), Ok(&[][..]));
}

#[test]
fn test_remove_vertex() {
    let mut graph = make_graph(
        4,
        &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0), (0, 2, 5.0)],
    );
    graph.remove_vertex(1).unwrap();
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.weight(1, 2), Ok(Some(3.0)));
    assert_eq!(graph.weight(2, 0), Ok(Some(4.0)));
    assert_eq!(
        graph.neighbours(0),
        Ok(&[Edge { from: 0, to: 1, weight: 5.0 }][..])
    );
    assert_eq!(
        graph.remove_vertex(3),
        Err(Error::InvalidIndex { index: 3, len: 3 })
    );
}

#[test]
fn test_transpose() {
    let graph = diamond().transpose();
    assert_eq!(graph.edge_count(), 5);
    let ends: Vec<usize> = graph.neighbours(3).unwrap().iter().map(|e| e.to).collect();
    assert_eq!(ends, vec![1, 2]);
    assert_eq!(graph.weight(4, 3), Ok(Some(1.0)));
    assert_eq!(graph.weight(3, 4), Ok(None));
}

#[test]
fn test_traversals() {
    let graph = diamond();
    assert_eq!(graph.bfs(0), Ok(vec![0, 1, 2, 3, 4]));
    assert_eq!(graph.dfs(0), Ok(vec![0, 1, 3, 4, 2]));
    assert_eq!(graph.dfs(3), Ok(vec![3, 4]));
    assert_eq!(graph.bfs(4), Ok(vec![4]));
}

#[test]
fn test_topological_sort() {
    let mut graph = diamond();
    assert!(!graph.has_cycle());
    let order = graph.topological_sort().unwrap();
    assert_eq!(order, vec![0, 2, 1, 3, 4]);

    graph.add_edge(4, 0, 1.0).unwrap();
    assert!(graph.has_cycle());
    assert_eq!(graph.topological_sort(), Err(Error::CycleDetected));

    let mut graph = Graph::new(1);
    graph.add_edge(0, 0, 1.0).unwrap();
    assert!(graph.has_cycle());
}

#[test]
fn test_strongly_connected_components() {
    let graph = make_graph(
        6,
        &[
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 0, 1.0),
            (2, 3, 1.0),
            (3, 4, 1.0),
            (4, 3, 1.0),
        ],
    );
    let components = graph.strongly_connected_components();
    assert_eq!(components, vec![vec![5], vec![0, 1, 2], vec![3, 4]]);
}

#[test]
fn test_dijkstra() {
    let graph = make_graph(
        5,
        &[(0, 1, 4.0), (0, 2, 1.0), (2, 1, 2.0), (1, 3, 1.0), (2, 3, 5.0)],
    );
    let paths = graph.dijkstra(0).unwrap();
    assert_eq!(paths[0], Some((0.0, None)));
    assert_eq!(paths[1], Some((3.0, Some(2))));
    assert_eq!(paths[2], Some((1.0, Some(0))));
    assert_eq!(paths[3], Some((4.0, Some(1))));
    assert_eq!(paths[4], None);

    let dist = graph.floyd_warshall();
    assert_eq!(dist[0][3], 4.0);
    assert_eq!(dist[2][3], 3.0);
    assert_eq!(dist[3][0], f64::INFINITY);
    assert!((0..5).all(|v| dist[v][v] == 0.0));
    for (v, path) in paths.iter().enumerate() {
        let want = path.map(|(d, _)| d).unwrap_or(f64::INFINITY);
        assert_eq!(dist[0][v], want);
    }
}

#[test]
fn test_prim() {
    let graph = make_graph(
        5,
        &[
            (0, 1, 1.0),
            (1, 2, 2.0),
            (0, 2, 4.0),
            (2, 3, 3.0),
            (3, 2, 1.0),
        ],
    );
    let tree = graph.prim(0).unwrap();
    assert_eq!(
        tree,
        vec![
            Edge { from: 0, to: 1, weight: 1.0 },
            Edge { from: 1, to: 2, weight: 2.0 },
            Edge { from: 2, to: 3, weight: 1.0 },
        ]
    );
    let total: f64 = tree.iter().map(|e| e.weight).sum();
    assert_eq!(total, 4.0);
    assert_eq!(graph.prim(4), Ok(vec![]));
}

#[test]
fn test_long_chain() {
    let n = 100_000;
    let mut graph = Graph::new(n);
    for v in 1..n {
        graph.add_edge(v - 1, v, 1.0).unwrap();
    }
    let want: Vec<usize> = (0..n).collect();
    assert_eq!(graph.dfs(0), Ok(want.clone()));
    assert!(!graph.has_cycle());
    assert_eq!(graph.topological_sort(), Ok(want));
    assert_eq!(graph.strongly_connected_components().len(), n);

    graph.add_edge(n - 1, 0, 1.0).unwrap();
    assert!(graph.has_cycle());
    let components = graph.strongly_connected_components();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].len(), n);
}
