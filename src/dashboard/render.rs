// Envelope → Screen
//
// Rows keep the order the API sent; nothing is re-sorted or filtered here.
// An empty ranking hides the refresh control, a non-empty one shows it.

use crate::format::format_brl;
use crate::models::{
    Comercio, GerarDadosResponse, LegacyTopResponse, TopCategoriasResponse, TopCidadesResponse,
    TopComerciosResponse,
};

use super::api::RequestError;
use super::screen::{GenerationView, Screen, TableView, Update};

pub const MERCHANTS_TITLE: &str = "Top 10 Empresas por Faturamento";
pub const CITIES_TITLE: &str = "Top 10 Cidades por Faturamento";
pub const CATEGORIES_TITLE: &str = "Top 10 Categorias por Faturamento";

const MERCHANT_COLUMNS: [&str; 5] = [
    "ID",
    "Nome Fantasia",
    "Faturamento Anual (R$)",
    "Cidade",
    "Status",
];

fn caption(fonte: &str, tempo: &str) -> String {
    format!("Fonte: {} | Tempo de processamento: {}", fonte, tempo)
}

fn ranking(title: &str, columns: &[&str], rows: Vec<Vec<String>>, caption: String) -> Update {
    if rows.is_empty() {
        return Update::new(Screen::Empty).with_refresh(false);
    }

    Update::new(Screen::Table(TableView {
        title: title.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
        caption,
    }))
    .with_refresh(true)
}

fn merchant_row(comercio: &Comercio) -> Vec<String> {
    vec![
        comercio.id_comercio.to_string(),
        comercio.nome_fantasia.clone(),
        format_brl(comercio.faturamento()),
        comercio.localizacao.cidade.clone(),
        comercio.status_operacional.clone(),
    ]
}

pub fn merchants(data: &TopComerciosResponse) -> Update {
    let rows = data.top_10_comercios.iter().map(merchant_row).collect();
    ranking(
        MERCHANTS_TITLE,
        &MERCHANT_COLUMNS,
        rows,
        caption(&data.fonte_dados, &data.tempo_processamento),
    )
}

/// Legacy ranking: same table, caption without a data source
///
/// Not a refreshable view, so the refresh control is hidden.
pub fn legacy_merchants(data: &LegacyTopResponse) -> Update {
    if data.top_10_comercios.is_empty() {
        return Update::new(Screen::Empty).with_refresh(false);
    }

    Update::new(Screen::Table(TableView {
        title: MERCHANTS_TITLE.to_string(),
        columns: MERCHANT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: data.top_10_comercios.iter().map(merchant_row).collect(),
        caption: format!("Tempo de processamento: {}", data.tempo_processamento),
    }))
    .with_refresh(false)
}

pub fn cities(data: &TopCidadesResponse) -> Update {
    let rows = data
        .top_10_cidades
        .iter()
        .map(|c| vec![c.cidade.clone(), c.faturamento.to_string()])
        .collect();
    ranking(
        CITIES_TITLE,
        &["Cidade", "Faturamento Total (R$)"],
        rows,
        caption(&data.fonte_dados, &data.tempo_processamento),
    )
}

pub fn categories(data: &TopCategoriasResponse) -> Update {
    let rows = data
        .top_10_categorias
        .iter()
        .map(|c| vec![c.categoria.clone(), c.faturamento.to_string()])
        .collect();
    ranking(
        CATEGORIES_TITLE,
        &["Categoria", "Faturamento Total (R$)"],
        rows,
        caption(&data.fonte_dados, &data.tempo_processamento),
    )
}

/// Generation result, shown verbatim; refresh stays hidden
pub fn generation(data: &GerarDadosResponse) -> Update {
    Update::new(Screen::Generated(GenerationView {
        mensagem: data.mensagem.clone(),
        registros_gerados: data.registros_gerados,
        tempo_processamento: data.tempo_processamento.clone(),
    }))
    .with_refresh(false)
}

pub fn load_error(error: &RequestError) -> Update {
    Update::new(Screen::Error(format!("Erro ao carregar os dados: {}", error)))
}

pub fn generation_error(error: &RequestError) -> Update {
    Update::new(Screen::Error(format!("Erro ao gerar os dados: {}", error)))
}
