//! Snapcart CLI

use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use snapcart::{
    config::ClientConfig,
    context::AppContext,
    domain::{
        carts::{
            data::NewCartItem,
            records::{CartSnapshot, PhotoFormat},
        },
        checkout::{
            CheckoutError,
            billing::BillingDetails,
            service::{CheckoutRequest, PaymentConfirmation, PaymentMethod},
        },
        orders::{
            data::OrderFilter,
            records::{Order, OrderStatus},
            service::PollOptions,
        },
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "snapcart", about = "Event-photography cart and checkout CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and mutate the shopping cart
    Cart(CartCommand),
    /// Drive the checkout flow
    Checkout(CheckoutCommand),
    /// Look up orders
    Orders(OrdersCommand),
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Fetch the server cart and print it
    Show,
    /// Add a photo to the cart
    Add(AddArgs),
    /// Add several photos from one event in a single batch
    AddMany(AddManyArgs),
    /// Change the quantity of a cart line (0 removes it)
    Update(UpdateArgs),
    /// Remove a cart line
    Remove(RemoveArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Photo identifier
    #[arg(long)]
    photo: String,

    /// Event the photo belongs to
    #[arg(long)]
    event: String,

    /// Number of copies
    #[arg(long, default_value = "1")]
    quantity: u32,

    /// Product format; digital when omitted
    #[arg(long, value_enum)]
    format: Option<PhotoFormat>,
}

#[derive(Debug, Args)]
struct AddManyArgs {
    /// Photo identifiers; repeat the flag for each photo
    #[arg(long = "photo", required = true)]
    photos: Vec<String>,

    /// Event the photos belong to
    #[arg(long)]
    event: String,

    /// Product format; digital when omitted
    #[arg(long, value_enum)]
    format: Option<PhotoFormat>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Cart line id
    #[arg(long)]
    item: String,

    /// New quantity
    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Cart line id
    #[arg(long)]
    item: String,
}

#[derive(Debug, Args)]
struct CheckoutCommand {
    #[command(subcommand)]
    command: CheckoutSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutSubcommand {
    /// Validate billing details and open a payment session
    Begin(BeginArgs),
    /// Turn a confirmed payment into a durable order
    Complete(CompleteArgs),
}

#[derive(Debug, Args)]
struct BeginArgs {
    /// Customer full name
    #[arg(long)]
    name: String,

    /// Customer email
    #[arg(long)]
    email: String,

    /// Customer phone number
    #[arg(long)]
    phone: String,

    /// Street address
    #[arg(long)]
    address: String,

    /// City
    #[arg(long)]
    city: String,

    /// Postal code
    #[arg(long)]
    postal_code: String,

    /// Country code
    #[arg(long)]
    country: String,

    /// Payment method
    #[arg(long, value_enum)]
    method: PaymentMethod,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    /// Order reference from the checkout hand-off
    #[arg(long)]
    order_ref: String,

    /// Payment intent id reported by the provider
    #[arg(long)]
    payment_intent: Option<String>,
}

#[derive(Debug, Args)]
struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Fetch a single order
    Get(GetOrderArgs),
    /// List orders
    List(ListOrdersArgs),
    /// Re-fetch an order until it settles
    Poll(PollOrderArgs),
}

#[derive(Debug, Args)]
struct GetOrderArgs {
    /// Order id
    #[arg(long)]
    id: String,
}

#[derive(Debug, Args)]
struct ListOrdersArgs {
    /// Only orders with this status
    #[arg(long, value_enum)]
    status: Option<OrderStatus>,
}

#[derive(Debug, Args)]
struct PollOrderArgs {
    /// Order id
    #[arg(long)]
    id: String,

    /// Seconds between checks
    #[arg(long, default_value = "2")]
    interval_secs: u64,

    /// Checks before giving up
    #[arg(long, default_value = "30")]
    attempts: u32,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.config.log_level)),
        )
        .init();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let context = AppContext::from_config(&cli.config)
        .map_err(|error| format!("failed to initialise the client: {error}"))?;

    match cli.command {
        Commands::Cart(CartCommand { command }) => run_cart(&context, command).await,
        Commands::Checkout(CheckoutCommand { command }) => run_checkout(&context, command).await,
        Commands::Orders(OrdersCommand { command }) => run_orders(&context, command).await,
    }
}

async fn run_cart(context: &AppContext, command: CartSubcommand) -> Result<(), String> {
    match command {
        CartSubcommand::Show => {
            context
                .carts
                .refresh()
                .await
                .map_err(|error| format!("failed to fetch the cart: {error}"))?;
            print_snapshot(&context.store.snapshot());
        }
        CartSubcommand::Add(args) => {
            let outcome = context
                .carts
                .add_item(NewCartItem {
                    photo_id: args.photo,
                    event_id: args.event,
                    quantity: args.quantity,
                    format: args.format,
                    thumbnail_url: None,
                })
                .await
                .map_err(|error| format!("failed to add the item: {error}"))?;

            println!("added ({outcome})");
            print_snapshot(&context.store.snapshot());
        }
        CartSubcommand::AddMany(args) => {
            let items = args
                .photos
                .into_iter()
                .map(|photo_id| NewCartItem {
                    photo_id,
                    event_id: args.event.clone(),
                    quantity: 1,
                    format: args.format,
                    thumbnail_url: None,
                })
                .collect();

            let report = context
                .carts
                .add_items(items)
                .await
                .map_err(|error| format!("batch add incomplete: {error}"))?;

            println!(
                "added {} of {} ({}, {} local-only)",
                report.added, report.requested, report.outcome, report.local_only
            );
            print_snapshot(&context.store.snapshot());
        }
        CartSubcommand::Update(args) => {
            let outcome = context
                .carts
                .update_quantity(args.item, args.quantity)
                .await
                .map_err(|error| format!("failed to update the item: {error}"))?;

            println!("updated ({outcome})");
            print_snapshot(&context.store.snapshot());
        }
        CartSubcommand::Remove(args) => {
            let outcome = context
                .carts
                .remove_item(args.item)
                .await
                .map_err(|error| format!("failed to remove the item: {error}"))?;

            println!("removed ({outcome})");
            print_snapshot(&context.store.snapshot());
        }
        CartSubcommand::Clear => {
            let outcome = context
                .carts
                .clear()
                .await
                .map_err(|error| format!("failed to clear the cart: {error}"))?;

            println!("cleared ({outcome})");
        }
    }

    Ok(())
}

async fn run_checkout(context: &AppContext, command: CheckoutSubcommand) -> Result<(), String> {
    match command {
        CheckoutSubcommand::Begin(args) => {
            context
                .carts
                .refresh()
                .await
                .map_err(|error| format!("failed to fetch the cart: {error}"))?;

            let request = CheckoutRequest {
                billing: BillingDetails {
                    full_name: args.name,
                    email: args.email,
                    phone: args.phone,
                    address: args.address,
                    city: args.city,
                    postal_code: args.postal_code,
                    country: args.country,
                },
                payment_method: Some(args.method),
            };

            let handoff = match context.checkout.begin(request).await {
                Ok(handoff) => handoff,
                Err(CheckoutError::InvalidBilling(issues)) => {
                    let details: Vec<String> = issues.iter().map(ToString::to_string).collect();

                    return Err(format!("billing rejected: {}", details.join(", ")));
                }
                Err(error) => return Err(format!("checkout failed: {error}")),
            };

            println!("order_ref: {}", handoff.order_ref);
            println!("checkout_url: {}", handoff.checkout_url);
            println!("open the checkout URL to finish paying");
        }
        CheckoutSubcommand::Complete(args) => {
            context
                .carts
                .refresh()
                .await
                .map_err(|error| format!("failed to fetch the cart: {error}"))?;

            let order = context
                .checkout
                .complete_order(PaymentConfirmation {
                    order_ref: args.order_ref,
                    payment_intent_id: args.payment_intent,
                })
                .await
                .map_err(|error| format!("failed to complete the order: {error}"))?;

            print_order(&order);
        }
    }

    Ok(())
}

async fn run_orders(context: &AppContext, command: OrdersSubcommand) -> Result<(), String> {
    match command {
        OrdersSubcommand::Get(args) => {
            let order = context
                .orders
                .get_order(args.id)
                .await
                .map_err(|error| format!("failed to fetch the order: {error}"))?;

            print_order(&order);
        }
        OrdersSubcommand::List(args) => {
            let orders = context
                .orders
                .list_orders(OrderFilter {
                    status: args.status,
                })
                .await
                .map_err(|error| format!("failed to list orders: {error}"))?;

            if orders.is_empty() {
                println!("no orders");
            }
            for order in &orders {
                println!(
                    "{}  {}  {}  {}",
                    order.id,
                    order.status,
                    format_amount(order.total, &order.currency),
                    order.created_at
                );
            }
        }
        OrdersSubcommand::Poll(args) => {
            let order = context
                .orders
                .poll_until_settled(
                    args.id,
                    PollOptions {
                        interval: Duration::from_secs(args.interval_secs),
                        max_attempts: args.attempts,
                    },
                )
                .await
                .map_err(|error| format!("order did not settle: {error}"))?;

            print_order(&order);
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &CartSnapshot) {
    if snapshot.items.is_empty() {
        println!("cart is empty");
        return;
    }

    for item in &snapshot.items {
        println!(
            "{}  photo={}  x{}  {}  {}",
            item.id,
            item.photo_id,
            item.quantity,
            item.format,
            format_amount(item.line_total(), &item.currency)
        );
    }

    let summary = snapshot.summary;
    let currency = snapshot
        .items
        .first()
        .map_or("EUR", |item| item.currency.as_str());
    println!(
        "{} items across {} events, total {}",
        summary.item_count,
        summary.unique_events,
        format_amount(summary.total, currency)
    );
}

fn print_order(order: &Order) {
    println!("order_id: {}", order.id);
    println!("order_ref: {}", order.order_ref);
    println!("status: {}", order.status);
    println!("total: {}", format_amount(order.total, &order.currency));
    if let Some(intent) = &order.payment_intent_id {
        println!("payment_intent: {intent}");
    }
}

fn format_amount(minor: u64, currency: &str) -> String {
    format!("{}.{:02} {currency}", minor / 100, minor % 100)
}
