use std::io::Write;

use clap::Args;
use harvest::{
    orders::{Order, OrderStatus},
    receipt,
};

use super::CliStore;

#[derive(Debug, Args)]
pub(crate) struct OrdersArgs {
    /// Show the details of one order, e.g. VEG-001
    #[arg(long)]
    number: Option<String>,

    /// Only list orders in this status
    #[arg(long)]
    status: Option<OrderStatus>,
}

pub(crate) fn run(store: &CliStore, args: &OrdersArgs, out: &mut impl Write) -> Result<(), String> {
    let orders = store.orders();

    if let Some(number) = &args.number {
        let order = orders
            .find_by_number(number)
            .ok_or_else(|| format!("order {number} not found"))?;

        return receipt::write_order(out, order)
            .map_err(|error| format!("failed to write order: {error}"));
    }

    let listed: Vec<Order> = match args.status {
        Some(status) => orders.with_status(status).cloned().collect(),
        None => orders.orders().to_vec(),
    };

    receipt::write_orders(out, &listed).map_err(|error| format!("failed to write orders: {error}"))
}
