//! Detección de ciclos por DFS con coloreo.
//!
//! El reporte no es "hay un ciclo": se devuelve el camino completo de ids en
//! orden, listo para mostrarse como `A -> B -> A`.

use indexmap::IndexSet;

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White, // no visitado
    Grey,  // en el stack actual
    Black, // subárbol completo, sin ciclos
}

/// Busca un ciclo en el grafo dado por listas de adyacencia (arista
/// `deps[i] -> i`, se recorre hacia los dependientes). Devuelve los índices
/// del ciclo en orden de recorrido, o `None` si el grafo es acíclico.
pub(crate) fn find_cycle(dependents: &[IndexSet<usize>]) -> Option<Vec<usize>> {
    let n = dependents.len();
    let mut colors = vec![Color::White; n];
    let mut stack: Vec<usize> = Vec::new();

    for start in 0..n {
        if colors[start] == Color::White {
            if let Some(cycle) = visit(start, dependents, &mut colors, &mut stack) {
                return Some(cycle);
            }
        }
    }
    None
}

fn visit(node: usize,
         dependents: &[IndexSet<usize>],
         colors: &mut [Color],
         stack: &mut Vec<usize>)
         -> Option<Vec<usize>> {
    colors[node] = Color::Grey;
    stack.push(node);

    for &next in &dependents[node] {
        match colors[next] {
            Color::Grey => {
                // Cerramos el ciclo: todo lo que está en el stack desde la
                // primera aparición de `next`.
                let from = stack.iter().position(|&i| i == next).unwrap_or(0);
                return Some(stack[from..].to_vec());
            }
            Color::White => {
                if let Some(cycle) = visit(next, dependents, colors, stack) {
                    return Some(cycle);
                }
            }
            Color::Black => {}
        }
    }

    stack.pop();
    colors[node] = Color::Black;
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(edges: &[(usize, usize)], n: usize) -> Vec<IndexSet<usize>> {
        let mut adj = vec![IndexSet::new(); n];
        for &(from, to) in edges {
            adj[from].insert(to);
        }
        adj
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let adj = adjacency(&[(0, 1), (1, 2), (0, 2)], 3);
        assert_eq!(find_cycle(&adj), None);
    }

    #[test]
    fn two_node_cycle_is_reported_in_order() {
        let adj = adjacency(&[(0, 1), (1, 0)], 2);
        assert_eq!(find_cycle(&adj), Some(vec![0, 1]));
    }

    #[test]
    fn self_edge_is_a_cycle_of_one() {
        let adj = adjacency(&[(0, 0)], 1);
        assert_eq!(find_cycle(&adj), Some(vec![0]));
    }

    #[test]
    fn longer_cycle_excludes_entry_tail() {
        // 0 -> 1 -> 2 -> 3 -> 1 : el ciclo es [1, 2, 3], no incluye el 0.
        let adj = adjacency(&[(0, 1), (1, 2), (2, 3), (3, 1)], 4);
        assert_eq!(find_cycle(&adj), Some(vec![1, 2, 3]));
    }
}
