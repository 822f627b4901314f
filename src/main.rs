// --- Sistema Generador de Horarios - Archivo principal ---

use std::env;
use std::fs;

use horarios::models::DatosUniversidad;
use horarios::{generar_horario, ConfigSA};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sistema Generador de Horarios ===");

    // Uso: horarios <datos.json> [config_sa.json] [salida.json]
    let args: Vec<String> = env::args().collect();
    let ruta_datos = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "datos_universidad.json".to_string());
    let ruta_salida = args
        .get(3)
        .cloned()
        .unwrap_or_else(|| "horario_semanal.json".to_string());

    println!("Datos de entrada: {}", ruta_datos);
    let contenido = fs::read_to_string(&ruta_datos)?;
    let datos: DatosUniversidad = serde_json::from_str(&contenido)?;

    println!(
        "Cargados: {} cursos, {} cursos en oferta, {} salas, {} profesores",
        datos.cursos.len(),
        datos.oferta.len(),
        datos.salas.len(),
        datos.profesores.len()
    );

    // Configuración del recocido: archivo opcional, si no los defaults
    let config = match args.get(2) {
        Some(ruta) => {
            let c = fs::read_to_string(ruta)?;
            serde_json::from_str::<ConfigSA>(&c)?
        }
        None => ConfigSA::default(),
    };

    let resultado = generar_horario(&datos, &config)?;

    if !resultado.sin_programar.is_empty() {
        eprintln!(
            "Atención: {} actividades quedaron sin programar",
            resultado.sin_programar.len()
        );
    }

    let json = serde_json::to_string_pretty(&resultado.export)?;
    fs::write(&ruta_salida, json)?;
    println!("Horario guardado en {}", ruta_salida);

    println!("Resumen de calidad:");
    println!("  costo final:            {:.2}", resultado.metricas.costo_total);
    println!(
        "  penalización espejo:    {:.0}",
        resultado.metricas.penalizacion_espejo
    );
    println!(
        "  espejo cumplido:        {:.1}%",
        resultado.metricas.espejo_cumplido_pct
    );
    println!(
        "  ayudantías miércoles:   {:.1}%",
        resultado.metricas.ayudantias_miercoles_pct
    );
    println!(
        "  prereq mismo bloque:    {:.1}%",
        resultado.metricas.prerequisitos_mismo_bloque_pct
    );
    println!(
        "  consistencia de salas:  {:.1}%",
        resultado.metricas.consistencia_salas_pct
    );
    println!(
        "  separación ideal:       {:.1}%",
        resultado.metricas.separacion_ideal_pct
    );

    Ok(())
}
