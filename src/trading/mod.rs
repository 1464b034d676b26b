pub mod plan_book;

pub use plan_book::PlanBook;
