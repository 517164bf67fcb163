//! Customer page rendering - dashboard page and HTMX fragments
//!
//! Endpoints:
//! - page_dashboard: Filters, customer table and chart panel
//! - htmx_customers_table: Filtered table (HTML fragment)
//! - htmx_customer_chart: Chart modal for one customer (HTML fragment)

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use custdash_config::{ChartConfig, CurrencyConfig};
use custdash_core::{CustomerChart, CustomerFilter, CustomerSummary, RecordId, ViewState};
use custdash_utils::{escape_html, format_money};
use serde::Deserialize;

use crate::chart::render_daily_chart;
use crate::routes::status::render_status_overlay;
use crate::AppState;

/// Query parameters of the dashboard page
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: String,
    /// Customer whose chart is opened on load
    #[serde(default)]
    pub customer: Option<String>,
}

/// Dashboard page
pub async fn page_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Html<String> {
    let dashboard = state.dashboard.read().await;

    let mut view = ViewState::default();
    view.set_name_filter(params.name);
    view.set_amount_filter(params.amount);

    let chart_panel = match params.customer.filter(|id| !id.is_empty()) {
        Some(id) => match dashboard.select(&mut view, &RecordId::new(id)) {
            Some(chart) => render_chart_modal(&chart, &state.config.chart, &state.config.currency),
            None => render_missing_chart(),
        },
        None => String::new(),
    };

    let summaries = dashboard.filtered(view.filter());
    let filter = view.filter();

    let inner_content = format!(
        r#"<div class='w-4/5 mx-auto relative'>
            <h1 class='text-2xl font-semibold my-4'>Customer Transactions</h1>
            <form id='filters' class='flex justify-between items-center flex-wrap gap-4' onsubmit='return false'>
                <label class='text-lg'>Filter by customer name:
                    <input type='text' name='name' value='{}' placeholder='Enter Customer Name'
                        hx-get='/customers/table' hx-target='#customers-table' hx-include='#filters'
                        hx-trigger='keyup changed delay:300ms, search'
                        class='rounded-md ml-4 border px-3 py-2 text-sm'>
                </label>
                <label class='text-lg'>Filter by amount:
                    <input type='text' name='amount' value='{}' placeholder='Enter amount'
                        hx-get='/customers/table' hx-target='#customers-table' hx-include='#filters'
                        hx-trigger='keyup changed delay:300ms, search'
                        class='rounded-md ml-4 border px-3 py-2 text-sm'>
                </label>
                <button type='button'
                    onclick="this.form.querySelectorAll('input').forEach(function (input) {{ input.value = ''; }})"
                    hx-get='/customers/table' hx-target='#customers-table' hx-vals='{{"name": "", "amount": ""}}'
                    class='bg-gray-900 text-white h-12 px-4 rounded'>Clear filters</button>
            </form>
            <div id='customers-table' class='py-6'>{}</div>
            <div id='chart-panel'>{}</div>
            {}
        </div>"#,
        escape_html(&filter.name),
        escape_html(&filter.amount),
        render_customer_table(&summaries, &state.config.currency),
        chart_panel,
        render_status_overlay(&dashboard.status()),
    );

    Html(crate::page_response(&headers, "Customer Transactions", &inner_content))
}

/// Page URL that reproduces a view: its filters and the open chart
pub fn view_url(view: &ViewState) -> String {
    let filter = view.filter();
    let mut params = Vec::new();
    if !filter.name.is_empty() {
        params.push(format!("name={}", urlencoding::encode(&filter.name)));
    }
    if !filter.amount.is_empty() {
        params.push(format!("amount={}", urlencoding::encode(&filter.amount)));
    }
    if let Some(id) = view.selected() {
        params.push(format!("customer={}", urlencoding::encode(id.as_str())));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// HTMX: Filtered customer table
///
/// Also empties the chart panel, since a filter change closes any open chart,
/// and pushes the page URL of the new view.
pub async fn htmx_customers_table(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> impl IntoResponse {
    let dashboard = state.dashboard.read().await;
    let view = ViewState::new(filter);
    let summaries = dashboard.filtered(view.filter());

    let body = format!(
        "{}<div id='chart-panel' hx-swap-oob='true'></div>",
        render_customer_table(&summaries, &state.config.currency)
    );
    ([("HX-Push-Url", view_url(&view))], Html(body))
}

/// HTMX: Chart modal for one customer
///
/// The current filters come along in the query so the pushed URL keeps them.
pub async fn htmx_customer_chart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(filter): Query<CustomerFilter>,
) -> impl IntoResponse {
    let dashboard = state.dashboard.read().await;
    let mut view = ViewState::new(filter);

    let body = match dashboard.select(&mut view, &RecordId::new(id)) {
        Some(chart) => render_chart_modal(&chart, &state.config.chart, &state.config.currency),
        None => render_missing_chart(),
    };
    ([("HX-Push-Url", view_url(&view))], Html(body))
}

/// Render the customer table, or the no-match notice when empty
pub fn render_customer_table(summaries: &[CustomerSummary], currency: &CurrencyConfig) -> String {
    let money = |amount| format_money(amount, &currency.symbol, currency.decimal_places);

    let notice = if summaries.is_empty() {
        "<div class='my-4 text-gray-600'>There are no transactions with this total amount.</div>"
    } else {
        ""
    };

    let rows: Vec<String> = summaries
        .iter()
        .map(|summary| {
            let items: Vec<String> = summary
                .transactions
                .iter()
                .map(|tx| {
                    format!(
                        "<li><div class='rounded text-gray-700 bg-gray-50 px-6 py-2 my-2'><div>Amount: {}</div><div>Date: {}</div></div></li>",
                        escape_html(&money(tx.amount)),
                        escape_html(&tx.date)
                    )
                })
                .collect();

            format!(
                r#"<tr class='bg-white border-b'>
                    <th scope='row' class='px-6 py-4 font-medium text-gray-900 whitespace-nowrap'>{}</th>
                    <td class='px-6 py-4'><ul>{}</ul></td>
                    <td class='px-6 py-4'>Total amount is {}</td>
                    <td class='px-6 py-4'><button hx-get='/customers/{}/chart' hx-target='#chart-panel' hx-include='#filters'
                        class='bg-indigo-600 text-white px-3 py-1 rounded hover:bg-indigo-700'>Show graph</button></td>
                </tr>"#,
                escape_html(&summary.name),
                items.join(""),
                escape_html(&money(summary.total_amount)),
                escape_html(&urlencoding::encode(summary.id.as_str())),
            )
        })
        .collect();

    format!(
        r#"{}<table class='w-full rounded text-sm text-left text-gray-500 border-2 border-gray-50'>
            <thead class='text-xs text-gray-700 uppercase bg-gray-50'>
                <tr>
                    <th scope='col' class='px-6 py-3'>Customer Name</th>
                    <th scope='col' class='px-6 py-3'>Transactions</th>
                    <th scope='col' class='px-6 py-3'>Total Amount</th>
                    <th scope='col' class='px-6 py-3'>Graph</th>
                </tr>
            </thead>
            <tbody>{}</tbody>
        </table>"#,
        notice,
        rows.join("")
    )
}

fn modal(title: &str, body: &str) -> String {
    format!(
        r#"<div id='chart-modal' class='fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-40'>
            <div class='bg-white rounded-xl shadow-lg p-6 max-w-3xl w-full'>
                <div class='flex items-center justify-between mb-4'>
                    <h3 class='text-lg font-semibold'>{}</h3>
                    <button hx-get='/customers/table' hx-target='#customers-table' hx-include='#filters'
                        class='text-gray-400 hover:text-gray-600 text-2xl leading-none'>&times;</button>
                </div>
                {}
            </div>
        </div>"#,
        title, body
    )
}

/// Render the chart modal for one customer
pub fn render_chart_modal(chart: &CustomerChart, config: &ChartConfig, currency: &CurrencyConfig) -> String {
    let title = escape_html(&chart.customer.name);

    if chart.daily.is_empty() {
        return modal(&title, "<p class='text-gray-500 text-center py-8'>No transactions to chart.</p>");
    }

    let body = match render_daily_chart(&chart.daily, config) {
        Ok(svg) => format!(
            "<div class='overflow-x-auto'>{}</div><p class='text-sm text-gray-500 mt-2'>Total amount is {}</p>",
            svg,
            escape_html(&format_money(chart.customer.total_amount, &currency.symbol, currency.decimal_places))
        ),
        Err(e) => {
            log::error!("Chart for customer {} failed: {}", chart.customer.id, e);
            "<p class='text-red-600 text-center py-8'>The chart could not be drawn.</p>".to_string()
        }
    };

    modal(&title, &body)
}

fn render_missing_chart() -> String {
    modal("Unknown customer", "<p class='text-gray-500 text-center py-8'>This customer no longer exists.</p>")
}
