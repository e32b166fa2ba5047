use std::{io::Write, str::FromStr};

use clap::Args;
use harvest::{
    orders::{CustomerDetails, NewOrder, PaymentMethod},
    products::{ProductId, Unit},
    receipt,
};
use jiff::civil::Date;
use rust_decimal::Decimal;

use super::CliStore;

/// Largest quantity of one product accepted per `--item`.
const MAX_ITEM_QUANTITY: u32 = 50;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Product to add, as ID=QTY or ID=QTY:UNIT (repeatable)
    #[arg(long = "item", value_name = "ID=QTY[:UNIT]", required = true)]
    items: Vec<ItemArg>,

    /// Customer name; taken from the signed-in user when omitted
    #[arg(long)]
    name: Option<String>,

    /// Customer email; taken from the signed-in user when omitted
    #[arg(long)]
    email: Option<String>,

    /// Customer phone; taken from the signed-in user when omitted
    #[arg(long)]
    phone: Option<String>,

    /// Payment method (card, cash, online)
    #[arg(long, default_value_t = PaymentMethod::Card)]
    payment: PaymentMethod,

    /// Card number, required for card payments; only the last four digits are kept
    #[arg(long)]
    card_number: Option<String>,

    /// Delivery address
    #[arg(long)]
    address: Option<String>,

    /// Delivery date (YYYY-MM-DD) for the order and the added products
    #[arg(long)]
    delivery_date: Option<Date>,

    /// Notes for the courier
    #[arg(long)]
    notes: Option<String>,

    /// Start from an empty basket instead of the demo basket
    #[arg(long)]
    empty: bool,
}

/// One `--item` value.
#[derive(Debug, Clone, PartialEq)]
struct ItemArg {
    product_id: ProductId,
    quantity: Decimal,
    unit: Option<Unit>,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (id, rest) = value
            .split_once('=')
            .ok_or_else(|| format!("expected ID=QTY[:UNIT], got {value:?}"))?;

        let (quantity, unit) = match rest.split_once(':') {
            Some((quantity, unit)) => (quantity, Some(unit)),
            None => (rest, None),
        };

        let product_id = id
            .trim()
            .parse::<u64>()
            .map_err(|error| format!("invalid product id {id:?}: {error}"))?;

        let quantity = quantity
            .trim()
            .parse::<Decimal>()
            .map_err(|error| format!("invalid quantity {quantity:?}: {error}"))?;

        if quantity <= Decimal::ZERO || quantity > Decimal::from(MAX_ITEM_QUANTITY) {
            return Err(format!(
                "quantity must be above 0 and at most {MAX_ITEM_QUANTITY}, got {quantity}"
            ));
        }

        let unit = unit
            .map(str::parse::<Unit>)
            .transpose()
            .map_err(|error| error.to_string())?;

        Ok(Self {
            product_id: ProductId::new(product_id),
            quantity,
            unit,
        })
    }
}

pub(crate) fn run(mut store: CliStore, args: CheckoutArgs, out: &mut impl Write) -> Result<(), String> {
    if args.empty {
        store.clear_basket();
    }

    for item in &args.items {
        store
            .add_to_basket(item.product_id, item.quantity, item.unit, args.delivery_date)
            .map_err(|error| format!("failed to add product {}: {error}", item.product_id))?;
    }

    let prefill = store.prefill_customer();

    let details = NewOrder {
        customer: CustomerDetails {
            name: args.name.unwrap_or(prefill.name),
            email: args.email.unwrap_or(prefill.email),
            phone: args.phone.unwrap_or(prefill.phone),
        },
        payment_method: args.payment,
        card_number: args.card_number,
        delivery_address: args.address,
        delivery_date: args.delivery_date,
        notes: args.notes,
    };

    details
        .validate()
        .map_err(|reason| format!("invalid checkout details: {reason}"))?;

    let order = store
        .checkout(details)
        .map_err(|error| format!("checkout failed: {error}"))?;

    receipt::write_order(&mut *out, &order)
        .map_err(|error| format!("failed to write order: {error}"))?;

    super::write_line(
        out,
        &format!(
            "Order {} placed. Orders on record: {}.",
            order.order_number,
            store.orders().len()
        ),
    )
}
