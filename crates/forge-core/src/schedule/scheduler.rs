//! Orden topológico determinista (algoritmo de Kahn).
//!
//! Cuando varios steps están listos a la vez, el desempate es estable y
//! documentado: fase, luego prioridad explícita (mayor primero), luego
//! orden de declaración. Dos invocaciones sobre el mismo input producen
//! órdenes byte-idénticos; el determinismo es una propiedad testeable, no
//! una optimización.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::BuildChain;
use crate::step::ExecutionPhase;

/// Clave de desempate; el heap entrega siempre el mínimo.
type ReadyKey = (ExecutionPhase, Reverse<i32>, usize, usize);

fn key_of(chain: &BuildChain, idx: usize) -> ReadyKey {
    let node = chain.node(idx);
    (node.descriptor().phase(),
     Reverse(node.descriptor().priority()),
     node.declaration_index(),
     idx)
}

/// Orden topológico válido de la cadena: cada step aparece estrictamente
/// después de todos los productores de los kinds que consume (y de sus
/// predecesores por hints). La cadena ya fue validada acíclica.
pub fn schedule(chain: &BuildChain) -> Vec<usize> {
    let n = chain.len();
    let mut indegree: Vec<usize> = (0..n).map(|i| chain.node(i).deps().len()).collect();
    let mut ready: BinaryHeap<Reverse<ReadyKey>> = BinaryHeap::new();

    for idx in 0..n {
        if indegree[idx] == 0 {
            ready.push(Reverse(key_of(chain, idx)));
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse((_, _, _, idx))) = ready.pop() {
        order.push(idx);
        for &dep in chain.node(idx).dependents() {
            indegree[dep] -= 1;
            if indegree[dep] == 0 {
                ready.push(Reverse(key_of(chain, dep)));
            }
        }
    }

    debug_assert_eq!(order.len(), n, "validated chain must schedule completely");
    order
}
