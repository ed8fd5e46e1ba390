// 📊 Revenue rankings
//
// Pure functions over the merchant list:
// - top merchants by annual gross revenue
// - revenue summed per city / per category, then ranked

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::Comercio;

/// Default ranking size used by every endpoint
pub const TOP_N: usize = 10;

/// Revenue total for one group (city or category)
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueTotal {
    pub name: String,
    pub faturamento: f64,
}

fn by_revenue_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Highest-revenue merchants first; returns fewer than `n` if the list is short
pub fn top_merchants(comercios: &[Comercio], n: usize) -> Vec<Comercio> {
    let mut ranked: Vec<&Comercio> = comercios.iter().collect();
    ranked.sort_by(|a, b| by_revenue_desc(a.faturamento(), b.faturamento()));
    ranked.into_iter().take(n).cloned().collect()
}

pub fn top_cities(comercios: &[Comercio], n: usize) -> Vec<RevenueTotal> {
    top_groups(comercios, n, |c| c.localizacao.cidade.as_str())
}

pub fn top_categories(comercios: &[Comercio], n: usize) -> Vec<RevenueTotal> {
    top_groups(comercios, n, |c| c.ramo_atividade.categoria.as_str())
}

fn top_groups<F>(comercios: &[Comercio], n: usize, key: F) -> Vec<RevenueTotal>
where
    F: Fn(&Comercio) -> &str,
{
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for comercio in comercios {
        *totals.entry(key(comercio)).or_insert(0.0) += comercio.faturamento();
    }

    let mut ranked: Vec<RevenueTotal> = totals
        .into_iter()
        .map(|(name, faturamento)| RevenueTotal {
            name: name.to_string(),
            faturamento,
        })
        .collect();

    // Ties broken by name so the ranking is stable across runs
    ranked.sort_by(|a, b| by_revenue_desc(a.faturamento, b.faturamento).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DadosFinanceiros, Localizacao, RamoAtividade};

    fn comercio(id: u64, cidade: &str, categoria: &str, faturamento: f64) -> Comercio {
        Comercio {
            id_comercio: id,
            nome_fantasia: format!("Comercio {}", id),
            ramo_atividade: RamoAtividade {
                categoria: categoria.to_string(),
                ..Default::default()
            },
            dados_financeiros: DadosFinanceiros {
                faturamento_anual_bruto: faturamento,
                ..Default::default()
            },
            localizacao: Localizacao {
                cidade: cidade.to_string(),
                ..Default::default()
            },
            status_operacional: "Ativo".to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Comercio> {
        vec![
            comercio(1, "Cidade 1", "Varejo", 100.0),
            comercio(2, "Cidade 2", "Saúde", 500.0),
            comercio(3, "Cidade 1", "Varejo", 300.0),
            comercio(4, "Cidade 3", "Alimentação", 50.0),
            comercio(5, "Cidade 2", "Varejo", 10.0),
        ]
    }

    #[test]
    fn test_top_merchants_sorted_and_limited() {
        let top = top_merchants(&sample(), 3);
        let ids: Vec<u64> = top.iter().map(|c| c.id_comercio).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_top_merchants_short_list_returns_all() {
        let top = top_merchants(&sample(), 10);
        assert_eq!(top.len(), 5);
        assert!(top_merchants(&[], 10).is_empty());
    }

    #[test]
    fn test_top_cities_sums_revenue() {
        let cities = top_cities(&sample(), 10);
        assert_eq!(
            cities,
            vec![
                RevenueTotal { name: "Cidade 2".to_string(), faturamento: 510.0 },
                RevenueTotal { name: "Cidade 1".to_string(), faturamento: 400.0 },
                RevenueTotal { name: "Cidade 3".to_string(), faturamento: 50.0 },
            ]
        );
    }

    #[test]
    fn test_top_categories_sums_and_truncates() {
        let categories = top_categories(&sample(), 2);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Saúde");
        assert_eq!(categories[0].faturamento, 500.0);
        assert_eq!(categories[1].name, "Varejo");
        assert_eq!(categories[1].faturamento, 410.0);
    }

    #[test]
    fn test_ties_ordered_by_name() {
        let data = vec![
            comercio(1, "Cidade B", "X", 100.0),
            comercio(2, "Cidade A", "X", 100.0),
        ];
        let cities = top_cities(&data, 10);
        assert_eq!(cities[0].name, "Cidade A");
        assert_eq!(cities[1].name, "Cidade B");
    }
}
