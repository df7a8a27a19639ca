//! Timetable markup extraction.
//!
//! The upstream HTML is streamed once through `lol_html`; handlers record
//! tables, their body rows and cells, and `h3` headings in document order.

use std::{cell::RefCell, rc::Rc};

use html_escape::decode_html_entities;
use lol_html::html_content::Element;
use lol_html::{element, end_tag, rewrite_str, text, RewriteStrSettings};

use crate::error::{AppError, Result};
use crate::scrape::types::{ExamGroup, ExamRecord, ScrapeResult};

/// Body rows of one `<table>`, each row being its trimmed `td` texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub rows: Vec<Vec<String>>,
}

/// Tables and headings found in a timetable fragment, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub tables: Vec<ParsedTable>,
    pub headings: Vec<String>,
}

impl ParsedDocument {
    /// Groups table `i` under heading `i`; a table without a heading gets `""`.
    pub fn into_groups(self) -> ScrapeResult {
        let ParsedDocument { tables, headings } = self;

        tables
            .into_iter()
            .enumerate()
            .map(|(index, table)| ExamGroup {
                heading: headings.get(index).cloned().unwrap_or_default(),
                tests: table
                    .rows
                    .iter()
                    .map(|cells| ExamRecord::from_cells(cells))
                    .collect(),
            })
            .collect()
    }

    /// Every body row of every table, ignoring grouping.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.tables
            .iter()
            .flat_map(|table| table.rows.iter().map(Vec::as_slice))
    }
}

/// Parser bookkeeping for one `<table>` that has not been closed yet.
#[derive(Debug)]
struct OpenTable {
    index: usize,
    in_header: bool,
    row_open: bool,
}

#[derive(Debug, Default)]
struct ParseState {
    document: ParsedDocument,
    open: Vec<OpenTable>,
}

impl ParseState {
    fn innermost(&mut self) -> Option<&mut OpenTable> {
        self.open.last_mut()
    }

    /// Row currently receiving cells, if the innermost table has one.
    fn current_row(&mut self) -> Option<&mut Vec<String>> {
        let open = self.open.last()?;
        if !open.row_open {
            return None;
        }
        self.document.tables.get_mut(open.index)?.rows.last_mut()
    }
}

/// Parses a timetable fragment.
///
/// Body rows are the `tr` elements of a table outside its `thead` and
/// `tfoot`, whether or not they sit in an explicit `tbody`. Rows and cells
/// belong to the innermost table still open.
pub fn parse_document(html: &str) -> Result<ParsedDocument> {
    let state = Rc::new(RefCell::new(ParseState::default()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("table", {
                    let state = Rc::clone(&state);
                    move |el: &mut Element| {
                        {
                            let mut state = state.borrow_mut();
                            let index = state.document.tables.len();
                            state.document.tables.push(ParsedTable::default());
                            state.open.push(OpenTable {
                                index,
                                in_header: false,
                                row_open: false,
                            });
                        }

                        let state = Rc::clone(&state);
                        el.on_end_tag(end_tag!(move |_end| {
                            state.borrow_mut().open.pop();
                            Ok(())
                        }))
                    }
                }),
                element!("thead, tfoot", {
                    let state = Rc::clone(&state);
                    move |el: &mut Element| {
                        if let Some(open) = state.borrow_mut().innermost() {
                            open.in_header = true;
                            open.row_open = false;
                        }

                        let state = Rc::clone(&state);
                        el.on_end_tag(end_tag!(move |_end| {
                            if let Some(open) = state.borrow_mut().innermost() {
                                open.in_header = false;
                            }
                            Ok(())
                        }))
                    }
                }),
                element!("tbody", {
                    let state = Rc::clone(&state);
                    move |_el| {
                        // an unclosed thead ends where the body starts
                        if let Some(open) = state.borrow_mut().innermost() {
                            open.in_header = false;
                        }
                        Ok(())
                    }
                }),
                element!("table tr", {
                    let state = Rc::clone(&state);
                    move |_el| {
                        let mut state = state.borrow_mut();
                        let Some(open) = state.open.last_mut() else {
                            return Ok(());
                        };
                        open.row_open = !open.in_header;
                        if open.row_open {
                            let index = open.index;
                            if let Some(table) = state.document.tables.get_mut(index) {
                                table.rows.push(Vec::new());
                            }
                        }
                        Ok(())
                    }
                }),
                element!("tr > td", {
                    let state = Rc::clone(&state);
                    move |_el| {
                        if let Some(row) = state.borrow_mut().current_row() {
                            row.push(String::new());
                        }
                        Ok(())
                    }
                }),
                text!("tr > td", {
                    let state = Rc::clone(&state);
                    move |chunk| {
                        let mut state = state.borrow_mut();
                        if let Some(cell) = state.current_row().and_then(|row| row.last_mut()) {
                            cell.push_str(chunk.as_str());
                        }
                        Ok(())
                    }
                }),
                element!("h3", {
                    let state = Rc::clone(&state);
                    move |_el| {
                        state.borrow_mut().document.headings.push(String::new());
                        Ok(())
                    }
                }),
                text!("h3", {
                    let state = Rc::clone(&state);
                    move |chunk| {
                        if let Some(heading) = state.borrow_mut().document.headings.last_mut() {
                            heading.push_str(chunk.as_str());
                        }
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| AppError::UpstreamUnavailable(format!("unparseable markup: {}", err)))?;

    let mut document = Rc::try_unwrap(state)
        .map(|cell| cell.into_inner().document)
        .unwrap_or_else(|rc| rc.borrow().document.clone());

    for cell in document
        .tables
        .iter_mut()
        .flat_map(|table| table.rows.iter_mut().flatten())
    {
        *cell = clean_text(cell);
    }
    for heading in document.headings.iter_mut() {
        *heading = clean_text(heading);
    }

    Ok(document)
}

/// Decodes every HTML5 character reference, then trims surrounding
/// whitespace.
fn clean_text(raw: &str) -> String {
    decode_html_entities(raw).trim().to_string()
}
