// src/handlers/render.rs

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    common::error::AppError,
    models::{
        auth::MeResponse,
        inventory::InventoryRow,
        tenancy::Tenant,
        view::ViewState,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// Para onde vai o texto: dados no stdout, avisos e erros no stderr
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout(String),
    Stderr(String),
}

impl Output {
    pub fn emit(&self) {
        match self {
            Output::Stdout(text) => println!("{text}"),
            Output::Stderr(text) => eprintln!("{text}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Right,
}

// Mensagens de cada tela
struct Messages {
    loading: &'static str,
    empty: &'static str,
}

const INVENTORY_MESSAGES: Messages = Messages {
    loading: "Loading inventory…",
    empty: "No inventory items found.",
};

const TENANT_MESSAGES: Messages = Messages {
    loading: "Loading tenants…",
    empty: "No tenants found.",
};

fn render_view<T: Serialize>(
    state: &ViewState<T>,
    format: OutputFormat,
    messages: &Messages,
    table: impl Fn(&T) -> String,
) -> Result<Output, AppError> {
    Ok(match (state, format) {
        (ViewState::Loading, _) => Output::Stderr(messages.loading.to_string()),
        (ViewState::Error(message), _) => Output::Stderr(message.clone()),
        (ViewState::Empty, OutputFormat::Table) => Output::Stderr(messages.empty.to_string()),
        (ViewState::Empty, OutputFormat::Json) => Output::Stdout("[]".to_string()),
        (ViewState::Populated(data), OutputFormat::Table) => Output::Stdout(table(data)),
        (ViewState::Populated(data), OutputFormat::Json) => {
            Output::Stdout(serde_json::to_string_pretty(data)?)
        }
    })
}

pub fn render_inventory(
    state: &ViewState<Vec<InventoryRow>>,
    format: OutputFormat,
) -> Result<Output, AppError> {
    render_view(state, format, &INVENTORY_MESSAGES, |rows| {
        let headers = [
            ("Product Name", Align::Left),
            ("SKU", Align::Left),
            ("Current Stock", Align::Right),
            ("Min Stock", Align::Right),
            ("ID", Align::Left),
        ];
        let cells = rows
            .iter()
            .map(|row| {
                vec![
                    row.product_name.clone(),
                    row.product_sku.clone(),
                    row.item.current_stock.to_string(),
                    row.item.min_stock.to_string(),
                    row.item.id.to_string(),
                ]
            })
            .collect();
        table(&headers, cells)
    })
}

pub fn render_tenants(
    state: &ViewState<Vec<Tenant>>,
    format: OutputFormat,
) -> Result<Output, AppError> {
    render_view(state, format, &TENANT_MESSAGES, |tenants| {
        let headers = [("Name", Align::Left), ("ID", Align::Left)];
        let cells = tenants
            .iter()
            .map(|tenant| vec![tenant.name.clone(), tenant.id.to_string()])
            .collect();
        table(&headers, cells)
    })
}

pub fn render_identity(
    state: &ViewState<MeResponse>,
    format: OutputFormat,
) -> Result<Output, AppError> {
    let messages = Messages {
        loading: "Loading profile…",
        empty: "No profile found.",
    };
    render_view(state, format, &messages, |me| {
        let tenant = me
            .tenant_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "—".to_string());
        format!(
            "Name:      {}\nEmail:     {}\nTenant:    {}\nSuperuser: {}",
            me.full_name,
            me.email,
            tenant,
            if me.is_superuser { "yes" } else { "no" }
        )
    })
}

// Tabela simples com colunas alinhadas (largura em caracteres, não bytes)
fn table(headers: &[(&str, Align)], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|(h, _)| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = " ".repeat(widths[i] - cell.chars().count());
                match headers[i].1 {
                    Align::Left => format!("{cell}{pad}"),
                    Align::Right => format!("{pad}{cell}"),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(headers.iter().map(|(h, _)| *h).collect()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        lines.push(format_line(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}
