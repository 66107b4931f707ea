//! HTML extraction for ranking and detail pages

use super::types::{Course, DetailData, Program, RankingRow};
use crate::config::SelectorConfig;
use crate::error::{Error, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Course headers carry a trailing `(count)` on its own line
const COURSE_COUNT_PATTERN: &str = r"\n\s*\(\d+\)";

/// Compiled selectors for both page kinds
#[derive(Debug, Clone)]
pub struct RankingExtractor {
    row: Selector,
    name_link: Selector,
    score: Selector,
    location: Selector,
    tuition_fee: Selector,
    tuition_fee_label: String,
    program_pane: Selector,
    course_header: Selector,
    degree: Selector,
    course_count: Regex,
}

impl RankingExtractor {
    /// Compile every selector in `config`
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            row: compile(&config.row)?,
            name_link: compile(&config.name_link)?,
            score: compile(&config.score)?,
            location: compile(&config.location)?,
            tuition_fee: compile(&config.tuition_fee)?,
            tuition_fee_label: config.tuition_fee_label.clone(),
            program_pane: compile(&config.program_pane)?,
            course_header: compile(&config.course_header)?,
            degree: compile(&config.degree)?,
            course_count: Regex::new(COURSE_COUNT_PATTERN)
                .map_err(|e| Error::Other(format!("invalid course pattern: {e}")))?,
        })
    }

    /// Extract the rows of a ranking page.
    ///
    /// Rows without a name link are skipped. Relative detail links are
    /// resolved against `page_url`.
    pub fn parse_ranking_page(&self, html: &str, page_url: &Url) -> Vec<RankingRow> {
        let document = Html::parse_document(html);
        let mut rows = Vec::new();

        for (position, row) in document.select(&self.row).enumerate() {
            let Some(link) = row.select(&self.name_link).next() else {
                warn!(%page_url, position, "Skipping ranking row without a name link");
                continue;
            };

            let detail_url = link.value().attr("href").and_then(|href| {
                page_url
                    .join(href)
                    .map_err(|e| warn!(%page_url, href, "Unusable detail link: {e}"))
                    .ok()
            });

            rows.push(RankingRow {
                position,
                name: text_of(link),
                score: first_text(row, &self.score).unwrap_or_default(),
                location: first_text(row, &self.location).unwrap_or_default(),
                detail_url,
            });
        }

        debug!(%page_url, rows = rows.len(), "Parsed ranking page");
        rows
    }

    /// Extract tuition fee and programs from a detail page
    pub fn parse_detail_page(&self, html: &str) -> DetailData {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let tuition_fee = first_text(root, &self.tuition_fee).map(|text| {
            text.replacen(&self.tuition_fee_label, "", 1)
                .trim()
                .to_string()
        });

        let programs: Vec<Program> = document
            .select(&self.program_pane)
            .map(|pane| self.program(pane))
            .collect();

        DetailData {
            tuition_fee,
            programs: (!programs.is_empty()).then_some(programs),
        }
    }

    fn program(&self, pane: ElementRef<'_>) -> Program {
        let name = pane.value().id().unwrap_or_default().replacen("tab", "", 1);
        let courses = pane
            .select(&self.course_header)
            .map(|header| Course {
                name: self.course_name(header),
                degrees: self.degrees_after(header),
            })
            .collect();
        Program { name, courses }
    }

    fn course_name(&self, header: ElementRef<'_>) -> String {
        let raw = header.text().collect::<String>();
        let raw = raw.trim();
        self.course_count.replace(raw, "").trim().to_string()
    }

    /// Degrees listed in the element right after a course header
    fn degrees_after(&self, header: ElementRef<'_>) -> Vec<String> {
        header
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|list| list.select(&self.degree).map(text_of).collect())
            .unwrap_or_default()
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(text_of)
}
