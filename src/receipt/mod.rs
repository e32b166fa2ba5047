//! Receipt
//!
//! Terminal tables for the catalog, the basket and the order history.

use std::{fmt::Write as _, io};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    basket::{Basket, BasketLine},
    orders::{Order, OrderStatus, PaymentMethod},
    products::Product,
};

/// Errors that can occur when writing a table.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Write the product list.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_catalog<'a>(
    mut out: impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Category", "Origin", "Price", "Unit"]);

    let mut rows = 0usize;

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.title.clone(),
            product.category.clone(),
            product.origin.clone(),
            product.price.to_string(),
            format!("per {}", product.unit),
        ]);

        rows += 1;
    }

    if rows == 0 {
        return writeln!(out, "\nNo products found.\n").map_err(|_err| ReceiptError::IO);
    }

    write_table(&mut out, builder, &[4], &[])
}

/// Write the basket lines followed by the basket total.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_basket(mut out: impl io::Write, basket: &Basket) -> Result<(), ReceiptError> {
    if basket.is_empty() {
        return writeln!(out, "\nBasket is empty.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    push_line_header(&mut builder);

    for line in basket.iter() {
        push_line_record(&mut builder, line);
    }

    write_table(&mut out, builder, &[3, 4, 6], &[])?;

    write_summary(
        &mut out,
        &[
            (" Lines:", basket.item_count().to_string()),
            (" \x1b[1mTotal:\x1b[0m", bold(&basket.total_price())),
        ],
    )
}

/// Write one row per order.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_orders(mut out: impl io::Write, orders: &[Order]) -> Result<(), ReceiptError> {
    if orders.is_empty() {
        return writeln!(out, "\nNo orders yet.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();
    let mut color_ops = Vec::with_capacity(orders.len());

    builder.push_record(["Order", "Placed", "Status", "Lines", "Payment", "Total"]);

    for (idx, order) in orders.iter().enumerate() {
        builder.push_record([
            order.order_number.clone(),
            order.created_at.strftime("%Y-%m-%d %H:%M").to_string(),
            order.status.to_string(),
            order.item_count().to_string(),
            order.payment_method.to_string(),
            order.total_amount.to_string(),
        ]);

        color_ops.push((idx + 1, 2, status_color(order.status)));
    }

    write_table(&mut out, builder, &[3, 5], &color_ops)
}

/// Write the full details of one order.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_order(mut out: impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    let mut details = vec![
        (" Order:", order.order_number.clone()),
        (
            " Placed:",
            order.created_at.strftime("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        (" Status:", order.status.to_string()),
        (" Customer:", order.customer.name.clone()),
        (" Email:", order.customer.email.clone()),
        (" Phone:", order.customer.phone.clone()),
        (
            " Payment:",
            payment_label(order.payment_method, order.card_last_four.as_deref()),
        ),
    ];

    if let Some(address) = &order.delivery_address {
        details.push((" Address:", address.clone()));
    }

    if let Some(date) = order.delivery_date {
        details.push((" Delivery:", date.to_string()));
    }

    if let Some(notes) = &order.notes {
        details.push((" Notes:", notes.clone()));
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)?;

    write_details(&mut out, &details)?;

    let mut builder = Builder::default();

    push_line_header(&mut builder);

    for line in &order.lines {
        push_line_record(&mut builder, line);
    }

    write_table(&mut out, builder, &[3, 4, 6], &[])?;

    write_summary(
        &mut out,
        &[(" \x1b[1mTotal:\x1b[0m", bold(&order.total_amount))],
    )
}

fn push_line_header(builder: &mut Builder) {
    builder.push_record(["", "Item", "Category", "Quantity", "Price", "Delivery", "Total"]);
}

fn push_line_record(builder: &mut Builder, line: &BasketLine) {
    builder.push_record([
        format!("#{}", line.id()),
        line.title().to_string(),
        line.category().to_string(),
        format!("{} {}", format_quantity(line.quantity()), line.unit()),
        format!("{} / {}", line.unit_price(), line.unit()),
        line.delivery_date().to_string(),
        line.line_total().to_string(),
    ]);
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: &[usize],
    color_ops: &[(usize, usize, Color)],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);

    for &column in right_aligned {
        table.modify(Columns::new(column..=column), Alignment::right());
    }

    for (row, col, color) in color_ops {
        table.modify((*row, *col), color.clone());
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

/// Label/value pairs with left-aligned values.
fn write_details(
    out: &mut impl io::Write,
    details: &[(&str, String)],
) -> Result<(), ReceiptError> {
    let label_width = details
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    for (label, value) in details {
        let label_pad = label_width.saturating_sub(visible_width(label));

        writeln!(out, "{label}{:label_pad$}  {value}", "").map_err(|_err| ReceiptError::IO)?;
    }

    Ok(())
}

/// Right-aligned label/value pairs under a table.
fn write_summary(
    out: &mut impl io::Write,
    lines: &[(&str, String)],
) -> Result<(), ReceiptError> {
    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value) + 2)
        .max()
        .unwrap_or_default();

    for (label, value) in lines {
        write_summary_line(out, label, &format!("{value}  "), label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

fn payment_label(method: PaymentMethod, card_last_four: Option<&str>) -> String {
    match (method, card_last_four) {
        (PaymentMethod::Card, Some(digits)) => format!("card •••• {digits}"),
        (method, _) => method.to_string(),
    }
}

/// Drop trailing zeros so `1.50` reads as `1.5`.
fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

fn bold(money: &Money<'_, Currency>) -> String {
    format!("\x1b[1m{money}\x1b[0m")
}

fn status_color(status: OrderStatus) -> Color {
    match status {
        OrderStatus::Pending => Color::new("\x1b[33m", "\x1b[0m"),
        OrderStatus::Processing => Color::new("\x1b[36m", "\x1b[0m"),
        OrderStatus::Delivered => Color::new("\x1b[34m", "\x1b[0m"),
        OrderStatus::Completed => Color::new("\x1b[32m", "\x1b[0m"),
        OrderStatus::Cancelled => Color::new("\x1b[90m", "\x1b[0m"),
    }
}

/// Dim the box-drawing characters of a rendered table.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}
