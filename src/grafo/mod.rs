// Grafo de conflictos: vértices = actividades, aristas = incompatibilidades duras

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::{NodeIndex, StableUnGraph};

use crate::expansion::clave_grupo_espejo;
use crate::models::{Actividad, Curso};

/// Mapa de cliques curriculares: curso -> cursos con los que forma clique.
/// Lo usa el recocido para chequear factibilidad en O(1).
pub type MapaCliques = HashMap<String, HashSet<String>>;

/// Grafo de conflictos G(V, E). Los vértices llevan el índice denso de la
/// actividad en el arreglo de entrada; la adyacencia vive en un
/// `StableUnGraph` para que eliminar vértices no invalide los demás índices.
#[derive(Debug, Clone)]
pub struct GrafoConflictos {
    grafo: StableUnGraph<usize, ()>,
    nodos: HashMap<usize, NodeIndex>,
}

impl GrafoConflictos {
    pub fn nuevo() -> GrafoConflictos {
        GrafoConflictos {
            grafo: StableUnGraph::default(),
            nodos: HashMap::new(),
        }
    }

    /// Agrega una actividad (por índice denso) como vértice aislado.
    pub fn agregar_vertice(&mut self, idx: usize) {
        if !self.nodos.contains_key(&idx) {
            let n = self.grafo.add_node(idx);
            self.nodos.insert(idx, n);
        }
    }

    /// Agrega una arista de conflicto. Ignora self-loops y duplicados.
    pub fn agregar_arista(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (na, nb) = match (self.nodos.get(&a), self.nodos.get(&b)) {
            (Some(&na), Some(&nb)) => (na, nb),
            _ => return,
        };
        if self.grafo.find_edge(na, nb).is_none() {
            self.grafo.add_edge(na, nb, ());
        }
    }

    pub fn tiene_arista(&self, a: usize, b: usize) -> bool {
        match (self.nodos.get(&a), self.nodos.get(&b)) {
            (Some(&na), Some(&nb)) => self.grafo.find_edge(na, nb).is_some(),
            _ => false,
        }
    }

    pub fn contiene(&self, idx: usize) -> bool {
        self.nodos.contains_key(&idx)
    }

    pub fn grado(&self, idx: usize) -> usize {
        match self.nodos.get(&idx) {
            Some(&n) => self.grafo.neighbors(n).count(),
            None => 0,
        }
    }

    pub fn vecinos(&self, idx: usize) -> Vec<usize> {
        match self.nodos.get(&idx) {
            Some(&n) => self
                .grafo
                .neighbors(n)
                .map(|v| self.grafo[v])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Cuenta los vecinos comunes entre dos vértices.
    pub fn vecinos_comunes(&self, a: usize, b: usize) -> usize {
        let (na, nb) = match (self.nodos.get(&a), self.nodos.get(&b)) {
            (Some(&na), Some(&nb)) => (na, nb),
            _ => return 0,
        };
        let vecinos_b: HashSet<NodeIndex> = self.grafo.neighbors(nb).collect();
        self.grafo
            .neighbors(na)
            .filter(|n| vecinos_b.contains(n))
            .count()
    }

    /// Elimina un vértice y todas sus aristas.
    pub fn eliminar_vertice(&mut self, idx: usize) {
        if let Some(n) = self.nodos.remove(&idx) {
            let _ = self.grafo.remove_node(n);
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.grafo.node_count()
    }

    pub fn num_aristas(&self) -> usize {
        self.grafo.edge_count()
    }

    pub fn esta_vacio(&self) -> bool {
        self.grafo.node_count() == 0
    }

    /// Índices de actividad de todos los vértices presentes.
    pub fn vertices(&self) -> Vec<usize> {
        self.nodos.keys().copied().collect()
    }
}

/// Construye el grafo de conflictos desde las actividades expandidas.
///
/// Aristas por pares: comparten profesor, o comparten sección dentro del
/// mismo curso. Aristas de clique curricular: cursos no electivos cuyo
/// conjunto de actividades se reduce a un solo grupo de secciones y que
/// comparten (carrera, semestre) en el plan; todas sus actividades quedan
/// mutuamente en conflicto.
///
/// Devuelve el grafo y el mapa de cliques (curso -> cursos en conflicto)
/// que el recocido usa como tabla lateral.
pub fn construir_grafo(actividades: &[Actividad], cursos: &[Curso]) -> (GrafoConflictos, MapaCliques) {
    let mut g = GrafoConflictos::nuevo();
    for idx in 0..actividades.len() {
        g.agregar_vertice(idx);
    }

    // Aristas por profesor compartido o sección compartida
    let mut aristas_pares = 0usize;
    for i in 0..actividades.len() {
        for j in (i + 1)..actividades.len() {
            let a = &actividades[i];
            let b = &actividades[j];
            if a.comparte_profesor(b) || a.comparte_seccion(b) {
                g.agregar_arista(i, j);
                aristas_pares += 1;
            }
        }
    }

    // Cursos electivos según el catálogo; un curso ausente del catálogo se
    // trata como obligatorio
    let electivos: HashSet<&str> = cursos
        .iter()
        .filter(|c| c.electivo)
        .map(|c| c.codigo.as_str())
        .collect();
    let planes: HashMap<&str, &HashMap<String, i32>> =
        cursos.iter().map(|c| (c.codigo.as_str(), &c.plan)).collect();

    // Grupos de secciones vistos por curso (el criterio de "sección única"
    // se decide con las actividades recibidas, no con el catálogo)
    let mut grupos_por_curso: HashMap<&str, HashSet<String>> = HashMap::new();
    let mut actividades_por_curso: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, a) in actividades.iter().enumerate() {
        grupos_por_curso
            .entry(a.codigo_curso.as_str())
            .or_default()
            .insert(clave_grupo_espejo(&a.codigo_curso, &a.secciones));
        actividades_por_curso
            .entry(a.codigo_curso.as_str())
            .or_default()
            .push(idx);
    }

    let seccion_unica: HashSet<&str> = grupos_por_curso
        .iter()
        .filter(|(curso, grupos)| grupos.len() == 1 && !electivos.contains(*curso))
        .map(|(curso, _)| *curso)
        .collect();

    // Agrupar los cursos de sección única por (carrera, semestre)
    let mut cursos_por_semestre: HashMap<(String, i32), Vec<&str>> = HashMap::new();
    for curso in &seccion_unica {
        if let Some(plan) = planes.get(curso) {
            for (carrera, semestre) in plan.iter() {
                cursos_por_semestre
                    .entry((carrera.clone(), *semestre))
                    .or_default()
                    .push(*curso);
            }
        }
    }

    let mut mapa_cliques: MapaCliques = HashMap::new();
    let mut aristas_clique = 0usize;
    let mut cliques = 0usize;

    for codigos in cursos_por_semestre.values() {
        if codigos.len() < 2 {
            continue;
        }
        cliques += 1;

        // Registrar el clique en la tabla lateral
        for a in codigos {
            let entrada = mapa_cliques.entry(a.to_string()).or_default();
            for b in codigos {
                if a != b {
                    entrada.insert(b.to_string());
                }
            }
        }

        // Conectar todas las actividades de los cursos del clique
        let mut idxs: Vec<usize> = Vec::new();
        for curso in codigos {
            if let Some(lista) = actividades_por_curso.get(*curso) {
                idxs.extend_from_slice(lista);
            }
        }
        for i in 0..idxs.len() {
            for j in (i + 1)..idxs.len() {
                if !g.tiene_arista(idxs[i], idxs[j]) {
                    g.agregar_arista(idxs[i], idxs[j]);
                    aristas_clique += 1;
                }
            }
        }
    }

    println!(
        "[grafo] {} vértices, {} aristas por pares, {} aristas de clique ({} cliques)",
        g.num_vertices(),
        aristas_pares,
        aristas_clique,
        cliques
    );

    (g, mapa_cliques)
}

/// Chequeo O(1) de conflicto de clique entre dos cursos.
pub fn hay_clique(mapa: &MapaCliques, curso_a: &str, curso_b: &str) -> bool {
    mapa.get(curso_a)
        .map(|s| s.contains(curso_b))
        .unwrap_or(false)
}
