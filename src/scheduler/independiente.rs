// Heurística de conjunto independiente máximo (estilo Dutton-Brigham):
// absorber juntos los vértices de alta conectividad para que el grafo
// restante se reduzca lo más rápido posible.

use std::collections::HashSet;

use crate::grafo::GrafoConflictos;

/// Extrae un conjunto independiente del grafo por expansión golosa.
///
/// Parte del vértice de grado máximo y agrega repetidamente el candidato no
/// adyacente al conjunto que maximiza los vecinos comunes con lo ya elegido
/// (empate: mayor grado). Si ningún candidato tiene vecinos comunes, cae al
/// no adyacente de mayor grado. Termina cuando no quedan candidatos.
pub fn conjunto_independiente(g: &GrafoConflictos) -> Vec<usize> {
    let mut vertices = g.vertices();
    if vertices.is_empty() {
        return Vec::new();
    }
    // Orden estable para que el resultado no dependa del orden de iteración
    // de los mapas internos
    vertices.sort_unstable();

    // Semilla: vértice de grado máximo
    let mut pivote = vertices[0];
    let mut grado_max = g.grado(pivote);
    for &v in &vertices[1..] {
        let d = g.grado(v);
        if d > grado_max {
            grado_max = d;
            pivote = v;
        }
    }

    let mut conjunto = vec![pivote];

    // Vértices vetados: los del conjunto y todos sus vecinos
    let mut vetados: HashSet<usize> = HashSet::new();
    vetados.insert(pivote);
    for v in g.vecinos(pivote) {
        vetados.insert(v);
    }

    // Vecindario acumulado del conjunto, para contar vecinos comunes
    let mut vecindario: HashSet<usize> = g.vecinos(pivote).into_iter().collect();

    loop {
        let mut mejor: Option<usize> = None;
        let mut mejor_comunes = 0usize;
        let mut mejor_grado = 0usize;

        for &cand in &vertices {
            if vetados.contains(&cand) {
                continue;
            }
            let comunes = g
                .vecinos(cand)
                .into_iter()
                .filter(|n| vecindario.contains(n))
                .count();
            let grado = g.grado(cand);

            let gana = match mejor {
                None => true,
                Some(_) => {
                    comunes > mejor_comunes
                        || (comunes == mejor_comunes && grado > mejor_grado)
                }
            };
            if gana {
                mejor = Some(cand);
                mejor_comunes = comunes;
                mejor_grado = grado;
            }
        }

        let elegido = match mejor {
            Some(v) => v,
            None => break,
        };

        conjunto.push(elegido);
        vetados.insert(elegido);
        for v in g.vecinos(elegido) {
            vetados.insert(v);
            vecindario.insert(v);
        }
    }

    conjunto
}
