//! Static network data for the Guadalajara light-rail and Mi Macro
//! corridors. Stations are listed in travel order so that line paths
//! drawn from registry order follow the real alignment.

use crate::line::{LineId, LineInfo, LineTable, Rgb};
use crate::registry::Registry;
use crate::station::Station;

/// Station whose drag moves the whole Macro Calzada corridor.
pub const DEFAULT_ANCHOR_STATION: &str = "mc-01";

fn line(id: LineId, name: &str, short_name: &str, hex: &str) -> LineInfo {
    LineInfo {
        id,
        name: name.to_string(),
        short_name: short_name.to_string(),
        color: Rgb::from_hex(hex).unwrap_or(Rgb(0, 0, 0)),
    }
}

pub fn guadalajara_lines() -> LineTable {
    LineTable::new(vec![
        line(LineId::Number(1), "Línea 1", "Línea 1", "#E11D48"),
        line(LineId::Number(2), "Línea 2", "Línea 2", "#16A34A"),
        line(LineId::Number(3), "Línea 3", "Línea 3", "#D946EF"),
        line(LineId::Number(4), "Línea 4", "Línea 4", "#F59E0B"),
        line(
            LineId::Number(5),
            "Macro Aeropuerto (L5)",
            "Macro Aeropuerto",
            "#0D9488",
        ),
        line(
            LineId::code("mc"),
            "Macro Calzada (L6)",
            "Macro Calzada",
            "#0891B2",
        ),
        line(
            LineId::code("mp"),
            "Macro Periférico (L7)",
            "Macro Periférico",
            "#7E22CE",
        ),
    ])
}

pub fn guadalajara_stations() -> Vec<Station> {
    vec![
        // Línea 1
        Station::rail("l1-audi", "Auditorio", 20.73524, -103.35079, 1),
        Station::rail("l1-pnor", "Periférico Norte", 20.7312, -103.3521, 1)
            .with_transfers(vec![LineId::code("mp")]),
        Station::rail("l1-derm", "Dermatológico", 20.72068, -103.35338, 1),
        Station::rail("l1-aten", "Atemajac", 20.71619, -103.35437, 1),
        Station::rail("l1-divn", "División del Norte", 20.70805, -103.3556, 1),
        Station::rail("l1-avca", "Ávila Camacho", 20.6992, -103.35476, 1)
            .with_transfers(vec![LineId::Number(3)]),
        Station::rail("l1-mezq", "Mezquitán", 20.69153, -103.35397, 1),
        Station::rail("l1-refu", "Refugio", 20.68244, -103.35401, 1),
        Station::rail("l1-juar", "Juárez", 20.67473, -103.35473, 1)
            .with_transfers(vec![LineId::Number(2)]),
        Station::rail("l1-mexi", "Mexicaltzingo", 20.66689, -103.35537, 1),
        Station::rail("l1-wash", "Washington", 20.66114, -103.35745, 1),
        Station::rail("l1-safi", "Santa Filomena", 20.65441, -103.36364, 1),
        Station::rail("l1-udep", "Unidad Deportiva", 20.6472, -103.36927, 1),
        Station::rail("l1-urda", "Urdaneta", 20.64325, -103.37268, 1),
        Station::rail("l1-18mz", "18 de Marzo", 20.63821, -103.37699, 1),
        Station::rail("l1-isra", "Isla Raza", 20.63272, -103.38064, 1),
        Station::rail("l1-patr", "Patria", 20.62684, -103.385, 1),
        Station::rail("l1-espa", "España", 20.6217, -103.38933, 1),
        Station::rail("l1-mart", "Santuario Mártires", 20.61395, -103.39547, 1),
        Station::rail("l1-psur", "Periférico Sur", 20.60756, -103.40079, 1)
            .with_transfers(vec![LineId::code("mp")]),

        // Línea 2
        Station::rail("l2-juar", "Juárez", 20.6747, -103.35474, 2)
            .with_transfers(vec![LineId::Number(1)]),
        Station::rail("l2-plun", "Plaza Universidad", 20.67513, -103.34814, 2)
            .with_transfers(vec![LineId::Number(3)]),
        Station::rail("l2-sjud", "San Juan de Dios", 20.67514, -103.34045, 2)
            .with_transfers(vec![LineId::code("mc")]),
        Station::rail("l2-bdom", "Belisario Domínguez", 20.67275, -103.33146, 2),
        Station::rail("l2-obla", "Oblatos", 20.67041, -103.3224, 2),
        Station::rail("l2-conate", "Cristóbal de Oñate", 20.66754, -103.3135, 2),
        Station::rail("l2-sand", "San Andrés", 20.66529, -103.30603, 2),
        Station::rail("l2-sjac", "San Jacinto", 20.66393, -103.29726, 2),
        Station::rail("l2-aurr", "La Aurora", 20.66252, -103.28567, 2),
        Station::rail("l2-tetl", "Tetlán", 20.65989, -103.27603, 2),

        // Línea 3
        Station::rail("l3-arcos", "Arcos de Zapopan", 20.74126, -103.40742, 3),
        Station::rail("l3-belen", "Periférico Belenes", 20.73819, -103.403, 3)
            .with_transfers(vec![LineId::code("mp")]),
        Station::rail("l3-mmar", "Mercado del Mar", 20.72914, -103.38927, 3),
        Station::rail("l3-zcen", "Zapopan Centro", 20.71982, -103.38155, 3),
        Station::rail("l3-ppat", "Plaza Patria", 20.71243, -103.37519, 3),
        Station::rail(
            "l3-ccou",
            "Circunvalación Country",
            20.70647,
            -103.36605,
            3,
        ),
        Station::rail("l3-avca", "Ávila Camacho", 20.69926, -103.35472, 3)
            .with_transfers(vec![LineId::Number(1)]),
        Station::rail("l3-norm", "La Normal", 20.69332, -103.3482, 3),
        Station::rail("l3-sant", "Santuario", 20.68408, -103.34784, 3),
        Station::rail("l3-gcen", "Guadalajara Centro", 20.6756, -103.34735, 3)
            .with_transfers(vec![LineId::Number(2)]),
        Station::rail("l3-inde", "Independencia", 20.67097, -103.34468, 3)
            .with_transfers(vec![LineId::code("mc")]),
        Station::rail("l3-pban", "Plaza de la Bandera", 20.66502, -103.33257, 3),
        Station::rail("l3-cucei", "CUCEI", 20.65969, -103.32397, 3),
        Station::rail("l3-revo", "Revolución", 20.651, -103.31017, 3),
        Station::rail("l3-rnilo", "Río Nilo", 20.64495, -103.30416, 3),
        Station::rail("l3-tlaq", "Tlaquepaque Centro", 20.63774, -103.29998, 3),
        Station::rail("l3-lcrd", "Lázaro Cárdenas", 20.63222, -103.29624, 3),
        Station::rail(
            "l3-caut",
            "Central de Autobuses",
            20.62331,
            -103.28513,
            3,
        ),

        // Línea 4
        Station::rail("l4-ljun", "Las Juntas", 20.60764, -103.3409, 4)
            .with_transfers(vec![LineId::code("mc")]),
        Station::rail("l4-acue", "Acueducto", 20.5884, -103.34659, 4),
        Station::rail("l4-jali", "Jalisco 200 Años", 20.57518, -103.35598, 4)
            .with_transfers(vec![LineId::code("mp")]),
        Station::rail("l4-real", "Real del Valle", 20.55943, -103.36551, 4),
        Station::rail(
            "l4-conc",
            "Concepción del Valle",
            20.52929,
            -103.38401,
            4,
        ),
        Station::rail("l4-cuer", "El Cuervo", 20.5071, -103.39354, 4),
        Station::rail("l4-loma", "Lomas del Sur", 20.48716, -103.40452, 4),
        Station::rail("l4-cut", "CUTlajo", 20.46955, -103.41491, 4),
        Station::rail("l4-tlaj", "Tlajomulco Centro", 20.46859, -103.43645, 4),

        // Mi Macro Calzada (L6)
        Station::brt("mc-01", "Mirador", 20.73711, -103.31217, "mc"),
        Station::brt("mc-02", "Huentitán", 20.73205, -103.31373, "mc"),
        Station::brt("mc-03", "Zoológico", 20.72692, -103.31515, "mc"),
        Station::brt("mc-04", "Independencia Norte", 20.72035, -103.31738, "mc")
            .with_transfers(vec![LineId::code("mp")]),
        Station::brt("mc-13", "San Juan de Dios", 20.67576, -103.34129, "mc")
            .with_transfers(vec![LineId::Number(2)]),
        Station::brt(
            "mc-14",
            "Independencia Bicentenario",
            20.66984,
            -103.34472,
            "mc",
        )
            .with_transfers(vec![LineId::Number(3)]),
        Station::brt("mc-27", "Fray Angélico", 20.6086, -103.34271, "mc"),

        // Mi Macro Periférico (L7)
        Station::brt(
            "mp-huen",
            "Barranca de Huentitán",
            20.7428,
            -103.2952,
            "mp",
        ),
        Station::brt(
            "mp-zoo",
            "Zoológico Guadalajara",
            20.7425,
            -103.3050,
            "mp",
        ),
        Station::brt("mp-inde", "Independencia Norte", 20.7420, -103.3173, "mp")
            .with_transfers(vec![LineId::code("mc")]),
        Station::brt("mp-lomas", "Lomas del Paraíso", 20.7410, -103.3280, "mp"),
        Station::brt("mp-rancho", "Rancho Nuevo", 20.7390, -103.3380, "mp"),
        Station::brt("mp-pnor", "Periférico Norte", 20.7312, -103.3521, "mp")
            .with_transfers(vec![LineId::Number(1)]),
        Station::brt(
            "mp-ccu",
            "Centros Cultural Universitario",
            20.7340,
            -103.3750,
            "mp",
        ),
        Station::brt("mp-const", "Constitución", 20.7360, -103.3850, "mp"),
        Station::brt("mp-taba", "Tabachines", 20.7370, -103.3950, "mp"),
        Station::brt("mp-belen", "Belenes", 20.7382, -103.403, "mp")
            .with_transfers(vec![LineId::Number(3)]),
        Station::brt("mp-isidro", "San Isidro", 20.7350, -103.4150, "mp"),
        Station::brt("mp-pino", "Pino Suárez", 20.7280, -103.4250, "mp"),
        Station::brt("mp-sjoc", "San Juan de Ocotán", 20.7080, -103.4380, "mp"),
        Station::brt("mp-vall", "Vallarta", 20.6788, -103.4352, "mp"),
        Station::brt("mp-stadium", "Estadio Chivas", 20.6650, -103.4340, "mp"),
        Station::brt("mp-cjud", "Ciudad Judicial", 20.6550, -103.4320, "mp"),
        Station::brt("mp-guad", "Guadalupe", 20.6450, -103.4255, "mp"),
        Station::brt("mp-mote", "Mariano Otero", 20.6300, -103.4200, "mp"),
        Station::brt("mp-ites", "ITESO", 20.6085, -103.4145, "mp"),
        Station::brt("mp-psur", "Periférico Sur", 20.6076, -103.4008, "mp")
            .with_transfers(vec![LineId::Number(1)]),
        Station::brt("mp-sseb", "San Sebastianito", 20.5950, -103.3850, "mp"),
        Station::brt("mp-8jul", "8 de Julio", 20.5850, -103.3750, "mp"),
        Station::brt("mp-adolf", "Adolf Horn", 20.5750, -103.3560, "mp")
            .with_transfers(vec![LineId::Number(4)]),
        Station::brt(
            "mp-chapala",
            "Carretera a Chapala",
            20.5740,
            -103.3250,
            "mp",
        ),
    ]
}

/// Registry seeded with the static network.
pub fn guadalajara() -> Registry {
    match Registry::new(guadalajara_stations()) {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("static station table is inconsistent: {}", e);
            Registry::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_table_has_unique_ids() {
        assert!(Registry::new(guadalajara_stations()).is_ok());
        assert_eq!(guadalajara().len(), 88);
    }

    #[test]
    fn test_every_station_line_has_a_color() {
        let lines = guadalajara_lines();
        for station in guadalajara().iter() {
            assert!(
                lines.get(&station.line).is_some(),
                "no color for line {}",
                station.line
            );
        }
    }

    #[test]
    fn test_anchor_is_on_macro_calzada() {
        let registry = guadalajara();
        let anchor = registry.get(DEFAULT_ANCHOR_STATION).unwrap();
        assert_eq!(anchor.line, LineId::code("mc"));
    }
}
