// 🎲 Synthetic merchant generator
//
// Produces plausible São Paulo state merchants for the data file:
// - Branch of activity from a fixed catalog
// - Company size (porte) drives the revenue range
// - Costs, taxes and margin derived from revenue
//
// The RNG is a parameter so tests can use a seeded StdRng.

use chrono::{Days, Months, NaiveDate};
use rand::Rng;

use crate::models::{Comercio, Coordenadas, DadosFinanceiros, Localizacao, RamoAtividade};

pub const ANO_FISCAL: i32 = 2024;

/// (id, categoria, subcategoria)
pub const RAMOS_ATIVIDADE: [(&str, &str, &str); 8] = [
    ("FOOD001", "Alimentação", "Padaria/Confeitaria"),
    ("FOOD002", "Alimentação", "Restaurante/Lanchonete"),
    ("RET001", "Varejo", "Loja de Roupas"),
    ("RET002", "Varejo", "Eletrônicos"),
    ("SERV001", "Serviços", "Consultoria"),
    ("SERV002", "Serviços", "Beleza/Estética"),
    ("AUTO001", "Automotivo", "Oficina Mecânica"),
    ("HEAL001", "Saúde", "Farmácia"),
];

// ============================================================================
// COMPANY SIZE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Porte {
    Mei,
    Pequena,
    Media,
    Grande,
}

impl Porte {
    pub const ALL: [Porte; 4] = [Porte::Mei, Porte::Pequena, Porte::Media, Porte::Grande];

    pub fn as_str(&self) -> &'static str {
        match self {
            Porte::Mei => "MEI",
            Porte::Pequena => "Pequena",
            Porte::Media => "Média",
            Porte::Grande => "Grande",
        }
    }

    /// Annual gross revenue range [low, high)
    pub fn faixa_faturamento(&self) -> (f64, f64) {
        match self {
            Porte::Mei => (60_000.0, 81_000.0),
            Porte::Pequena => (200_000.0, 4_800_000.0),
            Porte::Media => (5_000_000.0, 35_000_000.0),
            Porte::Grande => (10_000_000.0, 35_000_000.0),
        }
    }
}

// ============================================================================
// GENERATION
// ============================================================================

fn between<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.random::<f64>() * (high - low)
}

/// Build one random merchant with the given id
///
/// `today` anchors the opening date (up to ~10 years back).
pub fn generate_merchant<R: Rng>(id: u64, rng: &mut R, today: NaiveDate) -> Comercio {
    let (ramo_id, categoria, subcategoria) =
        RAMOS_ATIVIDADE[rng.random_range(0..RAMOS_ATIVIDADE.len())];
    let porte = Porte::ALL[rng.random_range(0..Porte::ALL.len())];

    let (low, high) = porte.faixa_faturamento();
    let faturamento = between(rng, low, high);
    let custos = faturamento * between(rng, 0.4, 0.6);
    let imposto = faturamento * between(rng, 0.05, 0.15);
    let margem_lucro = faturamento - custos - imposto;

    let latitude = between(rng, -23.8, -22.5);
    let longitude = between(rng, -47.0, -43.0);

    let endereco = format!("Rua {}, {}", id, rng.random_range(0..1000));
    let cidade = format!("Cidade {}", rng.random_range(0..100));
    let cep = format!("{:05}-000", rng.random_range(0..99_999));

    let data_abertura = opening_date(rng, today);

    // 9 in 10 merchants are active
    let status = if rng.random_range(0..10) == 9 {
        "Fechado"
    } else {
        "Ativo"
    };

    Comercio {
        id_comercio: id,
        nome_fantasia: format!("Comercio {}", id),
        ramo_atividade: RamoAtividade {
            id: ramo_id.to_string(),
            categoria: categoria.to_string(),
            subcategoria: subcategoria.to_string(),
        },
        dados_financeiros: DadosFinanceiros {
            faturamento_anual_bruto: faturamento,
            custos_operacionais_anual: custos,
            imposto_total_pago_anual: imposto,
            margem_lucro_liquida: margem_lucro,
            ano_fiscal: ANO_FISCAL,
        },
        localizacao: Localizacao {
            endereco,
            cidade,
            estado: "SP".to_string(),
            cep,
            coordenadas: Coordenadas {
                latitude,
                longitude,
            },
            regiao_geografica: "Sudeste".to_string(),
        },
        porte_empresa: porte.as_str().to_string(),
        data_abertura,
        status_operacional: status.to_string(),
    }
}

fn opening_date<R: Rng>(rng: &mut R, today: NaiveDate) -> String {
    let years: u32 = rng.random_range(0..10);
    let months: u32 = rng.random_range(0..12);
    let days: u64 = rng.random_range(0..28);

    today
        .checked_sub_months(Months::new(years * 12 + months))
        .and_then(|date| date.checked_sub_days(Days::new(days)))
        .unwrap_or(today)
        .format("%Y-%m-%d")
        .to_string()
}

/// Generate `count` merchants with consecutive ids starting at `start_id`
pub fn generate_batch<R: Rng>(
    start_id: u64,
    count: usize,
    rng: &mut R,
    today: NaiveDate,
) -> Vec<Comercio> {
    (0..count as u64)
        .map(|offset| generate_merchant(start_id + offset, rng, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_revenue_stays_in_porte_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for comercio in generate_batch(1, 500, &mut rng, today()) {
            let porte = Porte::ALL
                .iter()
                .find(|p| p.as_str() == comercio.porte_empresa)
                .expect("unknown porte");
            let (low, high) = porte.faixa_faturamento();
            let faturamento = comercio.faturamento();

            assert!(faturamento >= low && faturamento <= high);

            let financeiro = &comercio.dados_financeiros;
            assert!(financeiro.custos_operacionais_anual >= faturamento * 0.4);
            assert!(financeiro.custos_operacionais_anual <= faturamento * 0.6);
            let expected_margin = faturamento
                - financeiro.custos_operacionais_anual
                - financeiro.imposto_total_pago_anual;
            assert!((financeiro.margem_lucro_liquida - expected_margin).abs() < 1e-6);
        }
    }

    #[test]
    fn test_batch_ids_and_fixed_fields() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = generate_batch(101, 20, &mut rng, today());

        assert_eq!(batch.len(), 20);
        for (i, comercio) in batch.iter().enumerate() {
            let id = 101 + i as u64;
            assert_eq!(comercio.id_comercio, id);
            assert_eq!(comercio.nome_fantasia, format!("Comercio {}", id));
            assert_eq!(comercio.localizacao.estado, "SP");
            assert_eq!(comercio.localizacao.regiao_geografica, "Sudeste");
            assert_eq!(comercio.dados_financeiros.ano_fiscal, 2024);
            assert!(comercio.localizacao.cidade.starts_with("Cidade "));
            assert!(comercio.localizacao.cep.ends_with("-000"));
            assert_eq!(comercio.localizacao.cep.len(), 9);
            assert!(
                comercio.status_operacional == "Ativo" || comercio.status_operacional == "Fechado"
            );
            assert!(RAMOS_ATIVIDADE
                .iter()
                .any(|(rid, _, _)| *rid == comercio.ramo_atividade.id));
        }
    }

    #[test]
    fn test_coordinates_and_opening_date_bounds() {
        let mut rng = StdRng::seed_from_u64(3);

        for comercio in generate_batch(1, 200, &mut rng, today()) {
            let coords = &comercio.localizacao.coordenadas;
            assert!(coords.latitude >= -23.8 && coords.latitude <= -22.5);
            assert!(coords.longitude >= -47.0 && coords.longitude <= -43.0);

            let opened = NaiveDate::parse_from_str(&comercio.data_abertura, "%Y-%m-%d").unwrap();
            assert!(opened <= today());
            assert!(opened > NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_batch(1, 5, &mut StdRng::seed_from_u64(99), today());
        let b = generate_batch(1, 5, &mut StdRng::seed_from_u64(99), today());
        assert_eq!(a, b);
    }
}
