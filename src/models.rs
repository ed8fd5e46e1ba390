// Merchant records and API envelopes
// Field names follow the JSON contract of the data file and the HTTP API.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::format::format_brl;

// ============================================================================
// MERCHANT RECORD (data file shape)
// ============================================================================

/// Branch of activity (categoria is what the category ranking groups by)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RamoAtividade {
    #[serde(default)]
    pub id: String,
    pub categoria: String,
    #[serde(default)]
    pub subcategoria: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DadosFinanceiros {
    pub faturamento_anual_bruto: f64,
    #[serde(default)]
    pub custos_operacionais_anual: f64,
    #[serde(default)]
    pub imposto_total_pago_anual: f64,
    #[serde(default)]
    pub margem_lucro_liquida: f64,
    #[serde(default)]
    pub ano_fiscal: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordenadas {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Localizacao {
    #[serde(default)]
    pub endereco: String,
    pub cidade: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub coordenadas: Coordenadas,
    #[serde(default)]
    pub regiao_geografica: String,
}

/// One merchant (MerchantRecord)
///
/// Only id, name, revenue, city and status are needed by the dashboard;
/// everything else defaults so trimmed payloads still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Comercio {
    pub id_comercio: u64,
    pub nome_fantasia: String,
    #[serde(default)]
    pub ramo_atividade: RamoAtividade,
    pub dados_financeiros: DadosFinanceiros,
    pub localizacao: Localizacao,
    #[serde(default)]
    pub porte_empresa: String,
    #[serde(default)]
    pub data_abertura: String,
    pub status_operacional: String,
}

impl Comercio {
    pub fn faturamento(&self) -> f64 {
        self.dados_financeiros.faturamento_anual_bruto
    }
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Revenue amount as received by the dashboard
///
/// The server sends numbers; older backends sent pre-formatted BRL strings,
/// which are shown as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Value(f64),
    Formatted(String),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Value(value) => f.write_str(&format_brl(*value)),
            Amount::Formatted(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Value(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CidadeFaturamento {
    pub cidade: String,
    pub faturamento: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriaFaturamento {
    pub categoria: String,
    pub faturamento: Amount,
}

// ============================================================================
// ENVELOPES
// ============================================================================

// Go-style backends encode an empty list as null
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub const FONTE_CACHE: &str = "Cache";
pub const FONTE_AO_VIVO: &str = "Processamento ao Vivo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopComerciosResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_10_comercios: Vec<Comercio>,
    pub tempo_processamento: String,
    pub fonte_dados: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCidadesResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_10_cidades: Vec<CidadeFaturamento>,
    pub tempo_processamento: String,
    pub fonte_dados: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategoriasResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_10_categorias: Vec<CategoriaFaturamento>,
    pub tempo_processamento: String,
    pub fonte_dados: String,
}

/// Legacy `/top10` envelope (no data source label)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyTopResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_10_comercios: Vec<Comercio>,
    pub tempo_processamento: String,
}

/// Result of a `/gerar-dados` call (GenerationResult)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GerarDadosResponse {
    pub mensagem: String,
    pub tempo_processamento: String,
    /// Total records in the data file after generation
    pub registros_gerados: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_decodes_from_dashboard_subset() {
        let json = r#"{
            "id_comercio": 7,
            "nome_fantasia": "Comercio 7",
            "dados_financeiros": { "faturamento_anual_bruto": 1500.25 },
            "localizacao": { "cidade": "Cidade 3" },
            "status_operacional": "Ativo"
        }"#;

        let comercio: Comercio = serde_json::from_str(json).unwrap();
        assert_eq!(comercio.id_comercio, 7);
        assert_eq!(comercio.faturamento(), 1500.25);
        assert_eq!(comercio.localizacao.cidade, "Cidade 3");
        assert!(comercio.ramo_atividade.categoria.is_empty());
    }

    #[test]
    fn test_amount_accepts_number_or_preformatted_text() {
        let numeric: CidadeFaturamento =
            serde_json::from_str(r#"{"cidade":"Cidade 1","faturamento":12345.6}"#).unwrap();
        assert_eq!(numeric.faturamento.to_string(), "R$\u{a0}12.345,60");

        let text: CidadeFaturamento =
            serde_json::from_str(r#"{"cidade":"Cidade 1","faturamento":"R$ 9.999,00"}"#).unwrap();
        assert_eq!(text.faturamento.to_string(), "R$ 9.999,00");
    }

    #[test]
    fn test_envelope_missing_list_means_empty() {
        let envelope: TopCategoriasResponse =
            serde_json::from_str(r#"{"tempo_processamento":"1ms","fonte_dados":"Cache"}"#)
                .unwrap();
        assert!(envelope.top_10_categorias.is_empty());

        let null_list: TopCidadesResponse = serde_json::from_str(
            r#"{"top_10_cidades":null,"tempo_processamento":"1ms","fonte_dados":"Cache"}"#,
        )
        .unwrap();
        assert!(null_list.top_10_cidades.is_empty());
    }
}
