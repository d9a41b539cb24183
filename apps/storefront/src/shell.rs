//! Line-oriented stand-in for the storefront screens. Reads commands, drives
//! the store, prints the resulting views.

use std::{io::Write, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use shared::domain::{Product, ProductId};
use storefront_core::{
    query::{self, format_price, CatalogQuery, SortOrder},
    CatalogOrigin, FetchOutcome, Storefront, StorefrontEvent,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::broadcast::{self, error::TryRecvError},
};

pub const HELP: &str = "\
commands:
  list                      show products matching the current view
  categories                list categories
  category <name|all>       filter by category
  search <text>             filter by title/description (empty clears)
  sort <asc|desc|none>      order by price
  show <id>                 product details
  add <id>                  add a product to the cart
  inc <id> | dec <id>       adjust a cart line
  remove <id>               drop a cart line
  clear                     empty the cart
  cart                      show the cart
  refresh                   fetch the catalog again
  status                    catalog status
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Categories,
    Category(String),
    Search(String),
    Sort(Option<SortOrder>),
    Show(ProductId),
    Add(ProductId),
    Increase(ProductId),
    Decrease(ProductId),
    Remove(ProductId),
    Clear,
    Cart,
    Refresh,
    Status,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Self::List,
            "categories" => Self::Categories,
            "category" | "cat" => {
                if rest.is_empty() {
                    bail!("usage: category <name|all>");
                }
                Self::Category(rest.to_string())
            }
            "search" => Self::Search(rest.to_string()),
            "sort" => match rest {
                "" | "none" => Self::Sort(None),
                order => Self::Sort(Some(order.parse().map_err(|err: String| anyhow!(err))?)),
            },
            "show" => Self::Show(parse_id(rest)?),
            "add" => Self::Add(parse_id(rest)?),
            "inc" | "+" => Self::Increase(parse_id(rest)?),
            "dec" | "-" => Self::Decrease(parse_id(rest)?),
            "remove" | "rm" => Self::Remove(parse_id(rest)?),
            "clear" => Self::Clear,
            "cart" => Self::Cart,
            "refresh" | "fetch" => Self::Refresh,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(command)
    }
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.parse::<i64>()
        .map(ProductId)
        .with_context(|| format!("expected a product id, got '{raw}'"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    store: Arc<Storefront>,
    view: CatalogQuery,
    events: broadcast::Receiver<StorefrontEvent>,
}

impl Shell {
    pub fn new(store: Arc<Storefront>) -> Self {
        Self::with_view(store, CatalogQuery::default())
    }

    pub fn with_view(store: Arc<Storefront>, view: CatalogQuery) -> Self {
        let events = store.subscribe_events();
        Self {
            store,
            view,
            events,
        }
    }

    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        write!(out, "> ")?;
        out.flush()?;
        while let Some(line) = lines.next_line().await? {
            if !line.trim().is_empty() {
                match ShellCommand::parse(&line) {
                    Ok(command) => {
                        if self.execute(command, out).await? == Flow::Quit {
                            break;
                        }
                    }
                    Err(err) => writeln!(out, "error: {err:#}")?,
                }
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub async fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow> {
        let flow = self.dispatch(command, out).await?;
        self.print_notices(out)?;
        Ok(flow)
    }

    async fn dispatch<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow> {
        match command {
            ShellCommand::List => self.print_products(out).await?,
            ShellCommand::Categories => {
                let products = self.store.products().await;
                writeln!(out, "{}", query::categories(&products).join(", "))?;
            }
            ShellCommand::Category(name) => {
                self.view.category = (name != query::ALL_CATEGORIES).then_some(name);
                self.print_products(out).await?;
            }
            ShellCommand::Search(term) => {
                self.view.search = (!term.is_empty()).then_some(term);
                self.print_products(out).await?;
            }
            ShellCommand::Sort(order) => {
                self.view.sort = order;
                self.print_products(out).await?;
            }
            ShellCommand::Show(id) => match self.store.product_by_id(id).await {
                Some(product) => print_product_details(&product, out)?,
                None => writeln!(out, "no product with id {id}")?,
            },
            ShellCommand::Add(id) => {
                if !self.store.add_product(id).await {
                    writeln!(out, "no product with id {id}")?;
                }
                self.print_cart_summary(out).await?;
            }
            ShellCommand::Increase(id) => {
                self.store.increase_quantity(id).await;
                self.print_cart(out).await?;
            }
            ShellCommand::Decrease(id) => {
                self.store.decrease_quantity(id).await;
                self.print_cart(out).await?;
            }
            ShellCommand::Remove(id) => {
                self.store.remove_item(id).await;
                self.print_cart(out).await?;
            }
            ShellCommand::Clear => {
                self.store.clear_cart().await;
                self.print_cart(out).await?;
            }
            ShellCommand::Cart => self.print_cart(out).await?,
            // A fallback is announced by `print_notices`.
            ShellCommand::Refresh => match self.store.fetch_catalog().await {
                FetchOutcome::Fallback { .. } => {}
                outcome => print_outcome(&outcome, out)?,
            },
            ShellCommand::Status => self.print_status(out).await?,
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Reports store events the user would otherwise miss, including ones
    /// caused outside this shell.
    fn print_notices<W: Write>(&mut self, out: &mut W) -> Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(StorefrontEvent::CatalogFallbackUsed { reason }) => writeln!(
                    out,
                    "notice: catalog unavailable ({reason}); showing bundled products"
                )?,
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
            }
        }
    }

    pub async fn print_products<W: Write>(&self, out: &mut W) -> Result<()> {
        let products = self.view.apply(&self.store.products().await);
        if products.is_empty() {
            writeln!(out, "no products")?;
        }
        for product in &products {
            let in_cart = self.store.quantity_of(product.id).await;
            write!(
                out,
                "[{}] {} | {} | {}",
                product.id,
                product.title,
                format_price(product.price),
                product.category
            )?;
            if in_cart > 0 {
                write!(out, " | in cart: {in_cart}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub async fn print_cart<W: Write>(&self, out: &mut W) -> Result<()> {
        let cart = self.store.cart_snapshot().await;
        if cart.is_empty() {
            writeln!(out, "cart is empty")?;
            return Ok(());
        }
        for line in cart.items() {
            writeln!(
                out,
                "[{}] {} | {} x {} = {}",
                line.id,
                line.title,
                line.quantity,
                format_price(line.price),
                line.subtotal().map_or_else(|| "overflow".to_owned(), format_price)
            )?;
        }
        writeln!(
            out,
            "total: {} item(s), {}",
            cart.total_quantity(),
            format_price(cart.total_amount())
        )?;
        Ok(())
    }

    async fn print_cart_summary<W: Write>(&self, out: &mut W) -> Result<()> {
        let cart = self.store.cart_snapshot().await;
        writeln!(
            out,
            "cart: {} item(s), {}",
            cart.total_quantity(),
            format_price(cart.total_amount())
        )?;
        Ok(())
    }

    async fn print_status<W: Write>(&self, out: &mut W) -> Result<()> {
        let catalog = self.store.catalog_snapshot().await;
        write!(out, "catalog: {:?}, {} product(s)", catalog.status(), catalog.count())?;
        match catalog.origin() {
            Some(CatalogOrigin::Live { fetched_at }) => write!(out, ", live since {fetched_at}")?,
            Some(CatalogOrigin::Fallback { reason }) => write!(out, ", bundled ({reason})")?,
            Some(CatalogOrigin::Manual) => write!(out, ", set manually")?,
            None => {}
        }
        writeln!(out)?;
        if let Some(error) = catalog.error() {
            writeln!(out, "last error: {error}")?;
        }
        Ok(())
    }
}

fn print_product_details<W: Write>(product: &Product, out: &mut W) -> Result<()> {
    writeln!(out, "[{}] {}", product.id, product.title)?;
    writeln!(out, "price: {}", format_price(product.price))?;
    writeln!(out, "category: {}", product.category)?;
    writeln!(out, "image: {}", product.image)?;
    if !product.description.is_empty() {
        writeln!(out, "{}", product.description)?;
    }
    Ok(())
}

fn print_outcome<W: Write>(outcome: &FetchOutcome, out: &mut W) -> Result<()> {
    match outcome {
        FetchOutcome::Live { count } => writeln!(out, "loaded {count} product(s)")?,
        FetchOutcome::Fallback { reason } => {
            writeln!(out, "catalog unavailable ({reason}); showing bundled products")?
        }
        FetchOutcome::Failed { error } => writeln!(out, "catalog fetch failed: {error}")?,
        FetchOutcome::AlreadyLoading => writeln!(out, "catalog is already loading")?,
    }
    Ok(())
}

/// Outside the interactive session stdout carries listing data only, so the
/// startup fetch is reported on `diagnostics` instead.
pub fn report_startup_outcome<O: Write, D: Write>(
    outcome: &FetchOutcome,
    interactive: bool,
    out: &mut O,
    diagnostics: &mut D,
) -> Result<()> {
    if interactive {
        print_outcome(outcome, out)
    } else {
        print_outcome(outcome, diagnostics)
    }
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
