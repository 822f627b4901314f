// Estado del recocido: actividades + índices de ocupación duración-conscientes

use std::collections::HashMap;

use crate::error::ErrorNucleo;
use crate::grafo::{hay_clique, MapaCliques};
use crate::models::{
    dia_de, es_bloque_protegido, slot_de, Actividad, Curso, TipoEvento, BLOQUES_POR_DIA,
    TOTAL_BLOQUES,
};

/// Estado mutable del recocido simulado. Mantiene los índices de ocupación
/// (bloque -> actividades, (sala, bloque) -> actividad) y las tablas
/// laterales de grupos espejo, cursos y pares de prerequisito. Todos los
/// índices son duración-conscientes: una actividad de duración d aparece en
/// los d bloques que ocupa.
#[derive(Debug, Clone)]
pub struct EstadoSA {
    pub actividades: Vec<Actividad>,
    /// bloque -> índices de actividades que lo ocupan.
    ocupacion_bloques: Vec<Vec<usize>>,
    /// (sala, bloque) -> actividad que la ocupa.
    ocupacion_salas: HashMap<(String, i32), usize>,
    /// grupo espejo -> actividades del grupo (solo cátedras llevan grupo).
    pub hermanos: HashMap<String, Vec<usize>>,
    /// curso -> actividades del curso.
    pub por_curso: HashMap<String, Vec<usize>>,
    /// Pares (actividad de prerequisito, actividad dependiente).
    pub pares_prereq: Vec<(usize, usize)>,
    /// Por actividad: contrapartes en pares de prerequisito.
    pub socios_prereq: Vec<Vec<usize>>,
}

impl EstadoSA {
    /// Construye el estado indexando las actividades asignadas. Las tablas
    /// de hermanos, cursos y prerequisitos se reconstruyen una sola vez aquí.
    pub fn nuevo(actividades: Vec<Actividad>, cursos: &[Curso]) -> EstadoSA {
        let n = actividades.len();
        let mut estado = EstadoSA {
            actividades,
            ocupacion_bloques: vec![Vec::new(); TOTAL_BLOQUES as usize],
            ocupacion_salas: HashMap::new(),
            hermanos: HashMap::new(),
            por_curso: HashMap::new(),
            pares_prereq: Vec::new(),
            socios_prereq: vec![Vec::new(); n],
        };

        for idx in 0..n {
            let a = &estado.actividades[idx];
            if !a.grupo_espejo.is_empty() {
                estado
                    .hermanos
                    .entry(a.grupo_espejo.clone())
                    .or_default()
                    .push(idx);
            }
            estado
                .por_curso
                .entry(a.codigo_curso.clone())
                .or_default()
                .push(idx);
        }

        // Pares de prerequisito: (actividad del curso prerequisito,
        // actividad del curso dependiente)
        for curso in cursos {
            let dependientes = match estado.por_curso.get(&curso.codigo) {
                Some(d) => d.clone(),
                None => continue,
            };
            for prereq in &curso.prerequisitos {
                let previas = match estado.por_curso.get(prereq) {
                    Some(p) => p.clone(),
                    None => continue,
                };
                for &p in &previas {
                    for &d in &dependientes {
                        estado.pares_prereq.push((p, d));
                        estado.socios_prereq[p].push(d);
                        estado.socios_prereq[d].push(p);
                    }
                }
            }
        }

        for idx in 0..n {
            if estado.actividades[idx].asignada() {
                estado.indexar(idx);
            }
        }

        estado
    }

    /// Agrega la actividad a los índices de ocupación en todos sus bloques.
    fn indexar(&mut self, idx: usize) {
        let (bloque, duracion, sala) = {
            let a = &self.actividades[idx];
            (a.bloque, a.duracion, a.sala.clone())
        };
        for k in 0..duracion {
            let b = bloque + k;
            if b < 0 || b >= TOTAL_BLOQUES {
                continue;
            }
            self.ocupacion_bloques[b as usize].push(idx);
            if !sala.is_empty() {
                // entry: si el estado inicial trae una colisión de sala
                // (posible con duraciones > 1 antes del recocido), el primer
                // ocupante conserva la celda
                self.ocupacion_salas.entry((sala.clone(), b)).or_insert(idx);
            }
        }
    }

    /// Quita la actividad de los índices de ocupación.
    fn desindexar(&mut self, idx: usize) {
        let (bloque, duracion, sala) = {
            let a = &self.actividades[idx];
            (a.bloque, a.duracion, a.sala.clone())
        };
        for k in 0..duracion {
            let b = bloque + k;
            if b < 0 || b >= TOTAL_BLOQUES {
                continue;
            }
            self.ocupacion_bloques[b as usize].retain(|&i| i != idx);
            if !sala.is_empty() {
                let clave = (sala.clone(), b);
                if self.ocupacion_salas.get(&clave) == Some(&idx) {
                    self.ocupacion_salas.remove(&clave);
                }
            }
        }
    }

    /// Mueve la actividad a otro bloque actualizando ambos índices de una
    /// sola vez. El llamador ya validó el movimiento.
    pub fn mover_bloque(&mut self, idx: usize, nuevo_bloque: i32) {
        self.desindexar(idx);
        self.actividades[idx].bloque = nuevo_bloque;
        self.indexar(idx);
    }

    /// Mueve la actividad a otra sala (mismo bloque).
    pub fn mover_sala(&mut self, idx: usize, nueva_sala: &str) {
        self.desindexar(idx);
        self.actividades[idx].sala = nueva_sala.to_string();
        self.indexar(idx);
    }

    /// Actividades que ocupan un bloque dado.
    pub fn en_bloque(&self, bloque: i32) -> &[usize] {
        if bloque < 0 || bloque >= TOTAL_BLOQUES {
            return &[];
        }
        &self.ocupacion_bloques[bloque as usize]
    }

    /// Ocupante actual de una celda (sala, bloque).
    pub fn ocupante_sala(&self, sala: &str, bloque: i32) -> Option<usize> {
        self.ocupacion_salas
            .get(&(sala.to_string(), bloque))
            .copied()
    }

    /// Verifica que la sala esté libre (o tomada por la misma actividad) en
    /// todos los bloques [bloque, bloque + duracion).
    pub fn sala_libre_para(&self, idx: usize, sala: &str, bloque: i32, duracion: i32) -> bool {
        for k in 0..duracion {
            match self.ocupante_sala(sala, bloque + k) {
                Some(ocupante) if ocupante != idx => return false,
                _ => {}
            }
        }
        true
    }

    /// Chequeo de restricciones duras para mover `idx` al bloque propuesto
    /// conservando su sala actual:
    ///  - la actividad completa cabe en un solo día,
    ///  - el intervalo no toca el bloque protegido,
    ///  - la sala queda libre en todos los bloques del intervalo,
    ///  - ninguna actividad que solape comparte profesor, sección ni arista
    ///    de clique curricular.
    pub fn movimiento_valido(&self, idx: usize, bloque: i32, cliques: &MapaCliques) -> bool {
        let a = &self.actividades[idx];
        let duracion = a.duracion;

        if bloque < 0 || bloque >= TOTAL_BLOQUES {
            return false;
        }
        // Integridad de día: inicio y fin en el mismo día
        if dia_de(bloque) != dia_de(bloque + duracion - 1) {
            return false;
        }
        if slot_de(bloque) + duracion > BLOQUES_POR_DIA {
            return false;
        }
        for k in 0..duracion {
            if es_bloque_protegido(bloque + k) {
                return false;
            }
        }
        if !a.sala.is_empty() && !self.sala_libre_para(idx, &a.sala, bloque, duracion) {
            return false;
        }

        for k in 0..duracion {
            for &otro in self.en_bloque(bloque + k) {
                if otro == idx {
                    continue;
                }
                let b = &self.actividades[otro];
                if a.comparte_profesor(b)
                    || a.comparte_seccion(b)
                    || hay_clique(cliques, &a.codigo_curso, &b.codigo_curso)
                {
                    return false;
                }
            }
        }

        true
    }

    /// Índices de las actividades asignadas (las únicas que el recocido
    /// puede mover).
    pub fn asignadas(&self) -> Vec<usize> {
        (0..self.actividades.len())
            .filter(|&i| self.actividades[i].asignada())
            .collect()
    }

    /// Chequeo de consistencia entre actividades e índices de ocupación.
    /// Una entrada que apunte a una actividad inexistente o que no ocupa esa
    /// celda es un bug del programa.
    pub fn verificar(&self) -> Result<(), ErrorNucleo> {
        for (b, lista) in self.ocupacion_bloques.iter().enumerate() {
            for &idx in lista {
                let a = self.actividades.get(idx).ok_or_else(|| {
                    ErrorNucleo::InconsistenciaInterna(format!(
                        "ocupación del bloque {} referencia la actividad {} que no existe",
                        b, idx
                    ))
                })?;
                if !a.ocupa_bloque(b as i32) {
                    return Err(ErrorNucleo::InconsistenciaInterna(format!(
                        "la actividad {} está indexada en el bloque {} pero no lo ocupa",
                        a.codigo, b
                    )));
                }
            }
        }
        for ((sala, b), &idx) in &self.ocupacion_salas {
            let a = self.actividades.get(idx).ok_or_else(|| {
                ErrorNucleo::InconsistenciaInterna(format!(
                    "ocupación de sala ({}, {}) referencia la actividad {} que no existe",
                    sala, b, idx
                ))
            })?;
            if a.sala != *sala || !a.ocupa_bloque(*b) {
                return Err(ErrorNucleo::InconsistenciaInterna(format!(
                    "la actividad {} está indexada en ({}, {}) pero no ocupa esa celda",
                    a.codigo, sala, b
                )));
            }
        }
        for idx in 0..self.actividades.len() {
            let a = &self.actividades[idx];
            if !a.asignada() {
                continue;
            }
            for k in 0..a.duracion {
                let b = a.bloque + k;
                if b < 0 || b >= TOTAL_BLOQUES {
                    continue;
                }
                if !self.ocupacion_bloques[b as usize].contains(&idx) {
                    return Err(ErrorNucleo::InconsistenciaInterna(format!(
                        "la actividad {} ocupa el bloque {} pero no está indexada",
                        a.codigo, b
                    )));
                }
            }
        }
        Ok(())
    }

    /// Ayudantías del mismo curso que comparten al menos una sección con la
    /// actividad (las "hermanas de ayudantía" de una cátedra).
    pub fn ayudantias_asociadas(&self, idx: usize) -> Vec<usize> {
        let a = &self.actividades[idx];
        match self.por_curso.get(&a.codigo_curso) {
            Some(lista) => lista
                .iter()
                .copied()
                .filter(|&i| {
                    i != idx
                        && self.actividades[i].tipo == TipoEvento::Ayudantia
                        && self.actividades[i].comparte_seccion(a)
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Cátedras con grupo espejo del mismo curso que comparten sección con
    /// la ayudantía (inverso de `ayudantias_asociadas`).
    pub fn catedras_asociadas(&self, idx: usize) -> Vec<usize> {
        let a = &self.actividades[idx];
        match self.por_curso.get(&a.codigo_curso) {
            Some(lista) => lista
                .iter()
                .copied()
                .filter(|&i| {
                    i != idx
                        && self.actividades[i].tipo == TipoEvento::Catedra
                        && !self.actividades[i].grupo_espejo.is_empty()
                        && self.actividades[i].comparte_seccion(a)
                })
                .collect(),
            None => Vec::new(),
        }
    }
}
