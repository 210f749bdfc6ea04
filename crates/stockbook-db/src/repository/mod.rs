//! # Repository Module
//!
//! Store repository implementations for Stockbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                     │
//! │                                                                     │
//! │  The Repository pattern abstracts store access behind a clean API.  │
//! │                                                                     │
//! │  HTTP Handler                                                       │
//! │       │                                                             │
//! │       │  db.products().restock(id, &quantities, "jane")             │
//! │       ▼                                                             │
//! │  ProductRepository                                                  │
//! │  ├── get_by_id(&self, id)                                           │
//! │  ├── insert(&self, product)                                         │
//! │  ├── put(&self, product)          ← revision-guarded                │
//! │  └── restock(&self, id, adds, by) ← transactional                   │
//! │       │                                                             │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite Database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD, search, guarded restock
//! - [`sale::SaleRepository`] - Sales ledger and pending-payment settlement
//! - [`catalog::CompanyRepository`] / [`catalog::CategoryRepository`]
//! - [`customer::CustomerRepository`] - Customers and pending balances
//! - [`restock::RestockRepository`] - Restock audit trail

pub mod catalog;
pub mod customer;
pub mod product;
pub mod restock;
pub mod sale;
