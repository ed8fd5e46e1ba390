// HTML front end: Screen → markup for the #dashboard container, and the
// full page (web/index.html) around it.

use crate::format::escape_html;

use super::controller::Surface;
use super::screen::{Screen, EMPTY, GENERATED_TITLE};
use super::view::View;

const PAGE_TEMPLATE: &str = include_str!("../../web/index.html");

/// Markup for the content container
pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Blank => String::new(),
        Screen::Loading(message) => format!("<h2>{}</h2>", escape_html(message)),
        Screen::Empty => format!("<h2>{}</h2>", EMPTY),
        Screen::Error(message) => format!(
            "<p class=\"error\" style=\"color: red;\">{}</p>",
            escape_html(message)
        ),
        Screen::Generated(view) => format!(
            concat!(
                "<h2>{}</h2>\n",
                "<p>{}</p>\n",
                "<p><strong>Registros Gerados:</strong> {}</p>\n",
                "<p><strong>Tempo de Processamento:</strong> {}</p>"
            ),
            GENERATED_TITLE,
            escape_html(&view.mensagem),
            view.registros_gerados,
            escape_html(&view.tempo_processamento)
        ),
        Screen::Table(table) => {
            let mut html = format!("<h2>{}</h2>\n<table>\n<thead>\n<tr>", escape_html(&table.title));
            for column in &table.columns {
                html.push_str(&format!("<th>{}</th>", escape_html(column)));
            }
            html.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in &table.rows {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", escape_html(cell)));
                }
                html.push_str("</tr>\n");
            }
            html.push_str("</tbody>\n</table>\n");
            html.push_str(&format!(
                "<p class=\"processing-time\">{}</p>",
                escape_html(&table.caption)
            ));
            html
        }
    }
}

/// Surface backed by the HTML of the #dashboard container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlSurface {
    pub container: String,
    pub refresh_visible: bool,
}

impl Surface for HtmlSurface {
    fn replace(&mut self, screen: &Screen) {
        self.container = render_screen(screen);
    }

    fn set_refresh_visible(&mut self, visible: bool) {
        self.refresh_visible = visible;
    }
}

impl HtmlSurface {
    /// Full page: navigation, refresh link for `current`, container
    pub fn page(&self, current: View) -> String {
        let nav: Vec<String> = View::ALL
            .iter()
            .map(|view| {
                let class = if *view == current { " class=\"active\"" } else { "" };
                format!(
                    "            <a id=\"{}\"{} href=\"/?view={}\">{}</a>",
                    view.link_id(),
                    class,
                    view.slug(),
                    view.label()
                )
            })
            .collect();

        let refresh_href = format!("/?view={}&amp;refresh=true", current.slug());
        let refresh_display = if self.refresh_visible { "block" } else { "none" };

        PAGE_TEMPLATE
            .replace("{{nav}}", &nav.join("\n"))
            .replace("{{refresh_href}}", &refresh_href)
            .replace("{{refresh_display}}", refresh_display)
            .replace("{{dashboard}}", &self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::screen::{GenerationView, TableView};

    fn sample_table() -> Screen {
        Screen::Table(TableView {
            title: "Top 10 Cidades por Faturamento".into(),
            columns: vec!["Cidade".into(), "Faturamento Total (R$)".into()],
            rows: vec![
                vec!["Cidade 1".into(), "R$\u{a0}10,00".into()],
                vec!["<script>".into(), "R$\u{a0}5,00".into()],
            ],
            caption: "Fonte: Cache | Tempo de processamento: 1ms".into(),
        })
    }

    #[test]
    fn test_table_one_row_per_record_and_escaped() {
        let html = render_screen(&sample_table());

        assert_eq!(html.matches("<tr>").count(), 3); // header + 2 rows
        assert!(html.contains("<th>Cidade</th>"));
        assert!(html.contains("<td>&lt;script&gt;</td>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(
            "<p class=\"processing-time\">Fonte: Cache | Tempo de processamento: 1ms</p>"
        ));
        assert!(html.find("Cidade 1").unwrap() < html.find("&lt;script&gt;").unwrap());
    }

    #[test]
    fn test_other_screens() {
        assert_eq!(render_screen(&Screen::Blank), "");
        assert_eq!(render_screen(&Screen::Empty), "<h2>Nenhum dado encontrado.</h2>");
        assert_eq!(
            render_screen(&Screen::Error("Erro ao carregar os dados: Erro na API: Internal Server Error".into())),
            "<p class=\"error\" style=\"color: red;\">Erro ao carregar os dados: Erro na API: Internal Server Error</p>"
        );

        let generated = render_screen(&Screen::Generated(GenerationView {
            mensagem: "5 novos registros adicionados com sucesso!".into(),
            registros_gerados: 15,
            tempo_processamento: "3.2ms".into(),
        }));
        assert!(generated.contains("<h2>Dados Gerados com Sucesso!</h2>"));
        assert!(generated.contains("<p>5 novos registros adicionados com sucesso!</p>"));
        assert!(generated.contains("<strong>Registros Gerados:</strong> 15"));
        assert!(generated.contains("<strong>Tempo de Processamento:</strong> 3.2ms"));
    }

    #[test]
    fn test_page_wires_navigation_and_refresh() {
        let mut surface = HtmlSurface::default();
        surface.replace(&sample_table());
        surface.set_refresh_visible(true);

        let page = surface.page(View::Cidades);
        for view in View::ALL {
            assert!(page.contains(&format!("id=\"{}\"", view.link_id())));
        }
        assert!(page.contains("id=\"top10-cidades\" class=\"active\""));
        assert!(page.contains("href=\"/?view=cidades&amp;refresh=true\" style=\"display: block;\""));
        assert!(page.contains("<main id=\"dashboard\">"));
        assert!(page.contains("<td>Cidade 1</td>"));
        assert!(!page.contains("{{"));

        surface.set_refresh_visible(false);
        assert!(surface.page(View::Cidades).contains("style=\"display: none;\""));
    }
}
