//! Offset paging primitives shared by the repositories.
//!
//! A [`PageRequest`] names a zero-based page, a page size and a [`Sort`]. Queries answer
//! with either a [`Page`], which carries the total element count (one extra `COUNT(*)`
//! query), or a [`Slice`], which only knows whether another page follows.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A property that can appear in an `ORDER BY` clause.
///
/// Implementors map each variant to a fixed column name, so sort input never reaches
/// the SQL text unchecked.
pub trait SortProperty: Copy {
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order<P> {
    pub property: P,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort<P> {
    pub orders: Vec<Order<P>>,
}

impl<P: SortProperty> Sort<P> {
    pub fn by(direction: Direction, property: P) -> Self {
        Self {
            orders: vec![Order {
                property,
                direction,
            }],
        }
    }

    pub fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    pub fn and(mut self, direction: Direction, property: P) -> Self {
        self.orders.push(Order {
            property,
            direction,
        });
        self
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    /// Renders the `ORDER BY` clause. `key` is a unique column: it orders unsorted
    /// requests and breaks ties after the requested orders, so offset pages never
    /// overlap.
    pub fn order_by(&self, key: &str) -> String {
        if !self.is_sorted() {
            return format!("ORDER BY {}", key);
        }

        let mut orders = self
            .orders
            .iter()
            .map(|order| format!("{} {}", order.property.column(), order.direction.as_sql()))
            .collect::<Vec<_>>();

        if !self.orders.iter().any(|order| order.property.column() == key) {
            orders.push(key.to_string());
        }

        format!("ORDER BY {}", orders.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<P> {
    pub page: u32,
    pub size: u32,
    pub sort: Sort<P>,
}

impl<P: SortProperty> PageRequest<P> {
    pub fn of(page: u32, size: u32, sort: Sort<P>) -> Result<Self, AppError> {
        if size < 1 {
            return Err(AppError::BadRequest(
                "Page size must not be less than one".to_string(),
            ));
        }

        Ok(Self { page, size, sort })
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: i64,
}

impl<T> Page<T> {
    pub fn new<P>(content: Vec<T>, request: &PageRequest<P>, total_elements: i64) -> Self {
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 1;
        }
        let total = self.total_elements.max(0) as u64;
        total.div_ceil(u64::from(self.size)) as u32
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub has_next: bool,
}

impl<T> Slice<T> {
    /// Builds a slice from a query that fetched `size + 1` rows.
    pub fn from_overfetch<P>(mut rows: Vec<T>, request: &PageRequest<P>) -> Self {
        let size = request.size as usize;
        let has_next = rows.len() > size;
        rows.truncate(size);

        Self {
            content: rows,
            number: request.page,
            size: request.size,
            has_next,
        }
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}
