//! Pruning por alcanzabilidad inversa desde los kinds finales.
//!
//! La inclusión es demand-driven: se parte de los productores fuertes de
//! kinds finales (más los steps side-effecting, que nunca se eliminan) y se
//! camina hacia atrás por los consumes de cada step retenido, reteniendo a
//! sus productores fuertes. La eliminación cascadea sola: lo que nadie
//! alcanzó queda fuera. Computación determinista, sin efectos.

use indexmap::{IndexMap, IndexSet};

use crate::step::StepDescriptor;

/// Índices (dentro de `steps`) de los steps retenidos, en orden de
/// declaración.
pub(crate) fn retained_steps(steps: &[&StepDescriptor],
                             producers: &IndexMap<String, Vec<usize>>,
                             final_kinds: &IndexSet<String>)
                             -> IndexSet<usize> {
    let mut retained: IndexSet<usize> = IndexSet::new();
    let mut queue: Vec<usize> = Vec::new();

    let mut seed = |idx: usize, retained: &mut IndexSet<usize>, queue: &mut Vec<usize>| {
        if retained.insert(idx) {
            queue.push(idx);
        }
    };

    for (idx, step) in steps.iter().enumerate() {
        // Side-effecting: retenido incondicionalmente.
        if step.is_side_effect() {
            seed(idx, &mut retained, &mut queue);
            continue;
        }
        // Productor fuerte de un kind final.
        if step.produces()
               .iter()
               .any(|p| !p.weak && final_kinds.contains(&p.kind))
        {
            seed(idx, &mut retained, &mut queue);
        }
    }

    // Alcanzabilidad inversa: los consumes de un step retenido retienen a
    // sus productores fuertes (un produce débil nunca arrastra a su step).
    while let Some(idx) = queue.pop() {
        for consume in steps[idx].consumes() {
            for &producer in producers.get(&consume.kind).map(Vec::as_slice).unwrap_or(&[]) {
                let strong = steps[producer].produces()
                                            .iter()
                                            .any(|p| p.kind == consume.kind && !p.weak);
                if strong && retained.insert(producer) {
                    queue.push(producer);
                }
            }
        }
    }

    retained.sort_unstable();
    retained
}
