/// Dashboard views reachable from the navigation menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Top 10 merchants by annual revenue (default view)
    #[default]
    Faturamento,
    Cidades,
    Categorias,
    /// Generate-data trigger; has nothing to refresh
    GerarDados,
}

impl View {
    pub const ALL: [View; 4] = [
        View::Faturamento,
        View::Cidades,
        View::Categorias,
        View::GerarDados,
    ];

    /// Query-string value (`/?view=cidades`)
    pub fn slug(&self) -> &'static str {
        match self {
            View::Faturamento => "faturamento",
            View::Cidades => "cidades",
            View::Categorias => "categorias",
            View::GerarDados => "gerar-dados",
        }
    }

    pub fn from_slug(slug: &str) -> Option<View> {
        View::ALL.into_iter().find(|view| view.slug() == slug)
    }

    /// Element id of the navigation link
    pub fn link_id(&self) -> &'static str {
        match self {
            View::Faturamento => "top10-faturamento",
            View::Cidades => "top10-cidades",
            View::Categorias => "top10-categorias",
            View::GerarDados => "gerar-dados",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Faturamento => "Top 10 Faturamento",
            View::Cidades => "Top 10 Cidades",
            View::Categorias => "Top 10 Categorias",
            View::GerarDados => "Gerar Dados",
        }
    }

    /// Only the ranking views track as "current" and can be refreshed
    pub fn is_ranking(&self) -> bool {
        !matches!(self, View::GerarDados)
    }
}

/// Everything a front end can ask the dashboard to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Page ready: default load (top merchants, no refresh)
    Initialize,
    /// Menu click
    Navigate(View),
    /// Refresh control: reload the current view bypassing the server cache
    Refresh,
    /// Legacy `/top10` ranking
    LegacyTop10,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip_and_unknown() {
        for view in View::ALL {
            assert_eq!(View::from_slug(view.slug()), Some(view));
        }
        assert_eq!(View::from_slug("top10"), None);
    }

    #[test]
    fn test_only_generation_is_not_a_ranking() {
        let rankings: Vec<View> = View::ALL.into_iter().filter(|v| v.is_ranking()).collect();
        assert_eq!(rankings, vec![View::Faturamento, View::Cidades, View::Categorias]);
        assert_eq!(View::default(), View::Faturamento);
    }
}
