//! Cart ledger: line items, quantities and the totals derived from them.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::domain::{ProductId, ProductRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    /// Price captured when the line was created. Not re-synced afterwards.
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    fn new(product: ProductRef) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity: 1,
        }
    }

    /// `None` when `price * quantity` does not fit in a `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Add(ProductRef),
    Remove(ProductId),
    Increase(ProductId),
    Decrease(ProductId),
    Clear,
}

/// Lines keep insertion order and unique ids. `total_quantity` and
/// `total_amount` always equal the sums over `lines`; only `mutate`
/// writes them, and only after the sums were computed without overflow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    total_quantity: u64,
    total_amount: Decimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one command atomically. Returns whether the cart changed. A
    /// command whose totals would overflow leaves the cart untouched.
    pub fn apply(&mut self, command: CartCommand) -> bool {
        match command {
            CartCommand::Add(product) => self.add_item(product),
            CartCommand::Remove(id) => self.remove_item(id),
            CartCommand::Increase(id) => self.increase_quantity(id),
            CartCommand::Decrease(id) => self.decrease_quantity(id),
            CartCommand::Clear => self.clear(),
        }
    }

    pub fn add_item(&mut self, product: ProductRef) -> bool {
        self.mutate(|lines| match lines.iter_mut().find(|line| line.id == product.id) {
            Some(line) => bump(line),
            None => {
                lines.push(CartLine::new(product));
                true
            }
        })
    }

    pub fn remove_item(&mut self, id: ProductId) -> bool {
        self.mutate(|lines| {
            let before = lines.len();
            lines.retain(|line| line.id != id);
            lines.len() != before
        })
    }

    pub fn increase_quantity(&mut self, id: ProductId) -> bool {
        self.mutate(|lines| match lines.iter_mut().find(|line| line.id == id) {
            Some(line) => bump(line),
            None => false,
        })
    }

    /// A line at quantity 1 is removed rather than stored at 0.
    pub fn decrease_quantity(&mut self, id: ProductId) -> bool {
        self.mutate(|lines| {
            let Some(index) = lines.iter().position(|line| line.id == id) else {
                return false;
            };
            if lines[index].quantity <= 1 {
                lines.remove(index);
            } else {
                lines[index].quantity -= 1;
            }
            true
        })
    }

    pub fn clear(&mut self) -> bool {
        self.mutate(|lines| {
            let changed = !lines.is_empty();
            lines.clear();
            changed
        })
    }

    pub fn items(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.line(id).map_or(0, |line| line.quantity)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    fn mutate(&mut self, op: impl FnOnce(&mut Vec<CartLine>) -> bool) -> bool {
        let mut candidate = self.lines.clone();
        if !op(&mut candidate) {
            return false;
        }
        let Some((quantity, amount)) = totals(&candidate) else {
            return false;
        };
        self.lines = candidate;
        self.total_quantity = quantity;
        self.total_amount = amount;
        true
    }
}

fn totals(lines: &[CartLine]) -> Option<(u64, Decimal)> {
    lines
        .iter()
        .try_fold((0u64, Decimal::ZERO), |(quantity, amount), line| {
            Some((
                quantity.checked_add(u64::from(line.quantity))?,
                amount.checked_add(line.subtotal()?)?,
            ))
        })
}

fn bump(line: &mut CartLine) -> bool {
    match line.quantity.checked_add(1) {
        Some(next) => {
            line.quantity = next;
            true
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "tests/cart_tests.rs"]
mod tests;
