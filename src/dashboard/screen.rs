// Typed view-model shared by every dashboard front end

pub const LOADING: &str = "Carregando...";
pub const GENERATING: &str = "Gerando novos dados... Por favor, aguarde.";
pub const EMPTY: &str = "Nenhum dado encontrado.";
pub const GENERATED_TITLE: &str = "Dados Gerados com Sucesso!";

/// Ranking table: title, headers, one row per record, caption
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationView {
    pub mensagem: String,
    pub registros_gerados: u64,
    pub tempo_processamento: String,
}

/// Content of the output container
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Screen {
    /// Nothing loaded yet
    #[default]
    Blank,
    Loading(String),
    Table(TableView),
    /// The ranking came back with no rows
    Empty,
    Generated(GenerationView),
    /// Inline error line, full message text
    Error(String),
}

impl Screen {
    pub fn is_error(&self) -> bool {
        matches!(self, Screen::Error(_))
    }
}

/// One write to the dashboard: new container content and, optionally,
/// new refresh-control visibility (None leaves it as it is)
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub screen: Screen,
    pub refresh_visible: Option<bool>,
}

impl Update {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            refresh_visible: None,
        }
    }

    pub fn with_refresh(mut self, visible: bool) -> Self {
        self.refresh_visible = Some(visible);
        self
    }
}
