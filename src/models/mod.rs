pub mod export;
pub mod page;
pub mod stop;
pub mod tag;
pub mod trip;
